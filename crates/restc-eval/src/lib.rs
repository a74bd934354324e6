//! # restc-eval: Reference Evaluator for Generated Marshalling Code
//!
//! Generated headers are C++ and call into a runtime that is not part of this
//! repository. This crate models that runtime over `serde_json` and executes
//! a class's schema with the same semantics the emitters encode, so the
//! behavior of generated code can be tested (and previewed) without a C++
//! toolchain.
//!
//! ## Modules
//!
//! - [`runtime`]: `JsonBuildParse`, `JsonOpResult`, `ResponseCode`.
//! - [`native`]: key/val structures with buffer capacities and validity bits.
//! - [`evaluator`]: marshal/unmarshal execution, stub overrides, call log.

pub mod error;
pub mod evaluator;
pub mod native;
pub mod runtime;

pub use error::EvalError;
pub use evaluator::Evaluator;
pub use native::{NativePair, NativeStruct, NativeValue};
pub use runtime::{JsonBuildParse, JsonObject, JsonOpResult, ResponseCode};
