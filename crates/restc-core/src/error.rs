//! # Error Types
//!
//! Errors raised while converting raw schema strings into core vocabulary.
//! Higher layers wrap these with the source path and section name.

use thiserror::Error;

/// Error converting a raw schema value into a core type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The value cannot be used as a C++ identifier.
    #[error("invalid identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The `type` attribute names a kind outside the five known kinds.
    #[error("unknown field kind {0:?} (expected one of bool, int, string, array, object)")]
    UnknownFieldKind(String),

    /// A yes/no attribute carries some other value.
    #[error("attribute '{key}' must be 'yes' or 'no', got {value:?}")]
    InvalidFlag {
        /// Attribute name.
        key: String,
        /// The rejected value.
        value: String,
    },
}
