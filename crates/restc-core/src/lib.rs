//! # restc-core: Foundational Vocabulary for the Marshalling Compiler
//!
//! This crate defines the closed set of types every other `restc-*` crate
//! agrees on. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed sum types for schema vocabulary.** `FieldKind`, `Direction`,
//!    `BoundTo` and `Support` are plain enums. Every emitter and evaluator
//!    matches on them exhaustively, so an unhandled kind/direction pair is a
//!    compile error rather than a silently skipped branch.
//!
//! 2. **`Identifier` newtype.** Every name that ends up as a token in
//!    generated C++ (class names, namespaces, member names, validity enums,
//!    accessor names) passes through `Identifier::new()`. A schema value that
//!    is not a valid identifier is rejected before any code is emitted.
//!
//! 3. **Binding is an enum, not a string comparison.** The key-vs-val decision
//!    is taken once, when the schema graph is built, and carried as `BoundTo`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `restc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod binding;
pub mod error;
pub mod ident;
pub mod kind;

pub use binding::{parse_flag, BoundTo, Support};
pub use error::CoreError;
pub use ident::Identifier;
pub use kind::{Direction, FieldKind, FIELD_KIND_COUNT};
