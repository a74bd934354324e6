//! # Schema Errors
//!
//! Every schema-time failure aborts the compilation of the current source and
//! carries the source path. Nothing here is ever downgraded to a placeholder
//! value: a missing key never reaches string formatting.
//!
//! - [`ResolutionError`]: a named section, key, or member reference could
//!   not be resolved.
//! - [`SchemaError`]: everything that can go wrong between opening a source
//!   and holding a validated [`Schema`](crate::Schema).

use std::path::PathBuf;

use restc_core::Direction;
use thiserror::Error;

/// A named section, key or member reference could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// No section with this name exists in the source.
    #[error("{}: section [{section}] not found", .path.display())]
    SectionNotFound {
        /// Schema source path.
        path: PathBuf,
        /// Requested section name.
        section: String,
    },

    /// The section exists but does not define the key.
    #[error("{}: section [{section}] has no key '{key}'", .path.display())]
    KeyNotFound {
        /// Schema source path.
        path: PathBuf,
        /// Section name.
        section: String,
        /// Missing key.
        key: String,
    },

    /// The key exists but its `%(name)s` interpolation failed.
    #[error("{}: section [{section}] key '{key}': {reason}", .path.display())]
    Interpolation {
        /// Schema source path.
        path: PathBuf,
        /// Section name.
        section: String,
        /// Key whose value failed to interpolate.
        key: String,
        /// What went wrong.
        reason: String,
    },

    /// A `members` or `*_sections` entry names a section that does not exist.
    #[error("{}: [{referrer}] references missing section [{member}]", .path.display())]
    UnresolvedMember {
        /// Schema source path.
        path: PathBuf,
        /// Section holding the reference.
        referrer: String,
        /// The missing section.
        member: String,
    },
}

impl ResolutionError {
    /// Schema source the error belongs to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::SectionNotFound { path, .. }
            | Self::KeyNotFound { path, .. }
            | Self::Interpolation { path, .. }
            | Self::UnresolvedMember { path, .. } => path,
        }
    }
}

/// Error loading or validating a schema source.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The source file could not be read.
    #[error("{}: {source}", .path.display())]
    Io {
        /// Schema source path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The source is not well-formed INI.
    #[error("{}:{line}: {message}", .path.display())]
    Syntax {
        /// Schema source path.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A section, key or member could not be resolved.
    #[error("schema resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// A field kind outside the five known kinds, or a kind/direction pair
    /// with no implementation.
    #[error("{}: field [{field}]: unsupported field kind '{kind}'{}", .path.display(), direction_suffix(.direction))]
    UnsupportedFieldKind {
        /// Schema source path.
        path: PathBuf,
        /// Field section name.
        field: String,
        /// The `type` value as written.
        kind: String,
        /// The direction that lacks an implementation, if the kind itself is known.
        direction: Option<Direction>,
    },

    /// A section resolved but its content is not usable.
    #[error("{}: [{section}]: {message}", .path.display())]
    Invalid {
        /// Schema source path.
        path: PathBuf,
        /// Offending section.
        section: String,
        /// Description of the problem.
        message: String,
    },

    /// The member graph contains a cycle.
    #[error("{}: member cycle {chain}", .path.display())]
    Cycle {
        /// Schema source path.
        path: PathBuf,
        /// The cycle, rendered as `a -> b -> a`.
        chain: String,
    },
}

fn direction_suffix(direction: &Option<Direction>) -> String {
    match direction {
        Some(d) => format!(" for {d}"),
        None => String::new(),
    }
}

impl SchemaError {
    /// Schema source the error belongs to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Resolution(e) => e.path(),
            Self::Io { path, .. }
            | Self::Syntax { path, .. }
            | Self::UnsupportedFieldKind { path, .. }
            | Self::Invalid { path, .. }
            | Self::Cycle { path, .. } => path,
        }
    }

    pub(crate) fn invalid(
        path: &std::path::Path,
        section: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            path: path.to_path_buf(),
            section: section.to_string(),
            message: message.into(),
        }
    }
}
