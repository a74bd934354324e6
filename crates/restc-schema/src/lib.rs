//! # restc-schema: Schema Sources and the Validated Field Graph
//!
//! Reads INI-style schema sources and turns each one into an immutable
//! [`Schema`]: one code section, one or more classes, and an arena of field
//! nodes linked by member references.
//!
//! ## Layers
//!
//! - [`source`]: section/key access with `DEFAULT` inheritance and
//!   `%(name)s` interpolation. Every lookup is explicit: a missing section or
//!   key is a [`ResolutionError`], never an empty string.
//! - [`model`]: the eager graph build. All references, kinds, identifiers,
//!   bindings and cycles are checked here, so code emission never discovers a
//!   schema problem halfway through an output file.

pub mod error;
pub mod model;
pub mod source;

pub use error::{ResolutionError, SchemaError};
pub use model::{
    AggregatePlan, ClassDef, Field, FieldId, FieldShape, ObjectMembers, Schema, EMPTY_MEMBERS,
};
pub use source::{split_list, SchemaSource, Section, SectionRole, CLASS_KEYS};
