//! # Native Binding and Generation Support
//!
//! `BoundTo` records which of the class's two native structures a field's
//! storage lives in. The decision is structural string equality against the
//! class's `ipc_key_struct`: equal binds to the key struct, anything else
//! (including an absent `ipc_struct`) binds to the val struct.
//!
//! `Support` records, per direction, whether a field gets a generated
//! accessor, an overridable stub, or nothing at all.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Which native structure parameter a field is read from / written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundTo {
    /// The class's `ipc_key_struct` parameter.
    Key,
    /// The class's `ipc_val_struct` parameter.
    Val,
}

impl BoundTo {
    /// Resolve a field's binding against its class.
    pub fn resolve(field_struct: Option<&str>, class_key_struct: &str) -> Self {
        match field_struct {
            Some(s) if s == class_key_struct => Self::Key,
            _ => Self::Val,
        }
    }

    /// Parameter name used in generated accessors.
    pub fn param(&self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Val => "val",
        }
    }
}

impl std::fmt::Display for BoundTo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.param())
    }
}

/// How a field participates in one generation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Support {
    /// A full accessor is generated.
    Generate,
    /// A virtual stub returning success is generated as an override point.
    Abstract,
    /// No accessor; parents and aggregates skip the field.
    Omit,
}

impl Support {
    /// Combine a `*_support` and a `*_abstract` attribute.
    ///
    /// `support` defaults to `yes`; `abstract` defaults to `no` and only
    /// matters when support is `no`.
    pub fn from_flags(
        support_key: &str,
        support: Option<&str>,
        abstract_key: &str,
        abstract_: Option<&str>,
    ) -> Result<Self, CoreError> {
        let supported = parse_flag(support_key, support, true)?;
        let is_abstract = parse_flag(abstract_key, abstract_, false)?;
        Ok(match (supported, is_abstract) {
            (true, _) => Self::Generate,
            (false, true) => Self::Abstract,
            (false, false) => Self::Omit,
        })
    }

    /// Whether parents and aggregates call this accessor.
    pub fn is_invoked(&self) -> bool {
        !matches!(self, Self::Omit)
    }
}

/// Parse a `yes`/`no` attribute, falling back to `default` when absent.
pub fn parse_flag(key: &str, value: Option<&str>, default: bool) -> Result<bool, CoreError> {
    match value {
        None => Ok(default),
        Some("yes") => Ok(true),
        Some("no") => Ok(false),
        Some(other) => Err(CoreError::InvalidFlag {
            key: key.to_string(),
            value: other.to_string(),
        }),
    }
}
