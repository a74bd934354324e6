//! Evaluator errors: misuse of the evaluator itself, not runtime failures.
//! Runtime failures are [`ResponseCode::GenericError`](crate::ResponseCode)
//! results, exactly as generated code reports them.

use restc_core::{Direction, FieldKind};
use thiserror::Error;

/// Error setting up or driving an [`Evaluator`](crate::Evaluator).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// No class with this name in the schema.
    #[error("class '{0}' not found")]
    UnknownClass(String),

    /// The class declares no aggregate for this direction.
    #[error("class '{class}' declares no {direction} aggregate")]
    NoAggregate {
        /// Class name.
        class: String,
        /// Missing direction.
        direction: Direction,
    },

    /// An override names no accessor of the class.
    #[error("class '{class}' has no accessor '{accessor}'")]
    UnknownAccessor {
        /// Class name.
        class: String,
        /// Requested accessor.
        accessor: String,
    },

    /// An override names an accessor that is generated, not a stub.
    #[error("accessor '{0}' is generated and cannot be overridden")]
    NotAbstract(String),

    /// A kind/direction pair the runtime does not implement.
    #[error("field [{field}]: no {direction} semantics for {kind} fields")]
    Unsupported {
        /// Field section name.
        field: String,
        /// Field kind.
        kind: FieldKind,
        /// Direction.
        direction: Direction,
    },
}
