//! # Code Generation Errors
//!
//! Any error aborts the current unit before its output file is touched.

use std::path::PathBuf;

use restc_core::{Direction, FieldKind};
use restc_schema::SchemaError;
use thiserror::Error;

/// Error generating or writing one compilation unit.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// The schema source failed to load or validate.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A kind/direction pair with no emitter.
    #[error("field [{field}]: no {direction} emitter for {kind} fields")]
    Unsupported {
        /// Field section name.
        field: String,
        /// Field kind.
        kind: FieldKind,
        /// Direction lacking an emitter.
        direction: Direction,
    },

    /// A field shape the emitters cannot express.
    #[error("field [{field}]: {message}")]
    Shape {
        /// Field section name.
        field: String,
        /// Description of the problem.
        message: String,
    },

    /// No output file name can be derived from the source path.
    #[error("{}: cannot derive an output file name", .path.display())]
    SourcePath {
        /// Schema source path.
        path: PathBuf,
    },

    /// Reading or writing an output file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
