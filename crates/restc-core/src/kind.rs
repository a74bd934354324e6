//! # Field Kinds and Generation Directions
//!
//! `FieldKind` is the one definition of the five schema node kinds. The
//! `type` attribute of a field section parses into it; anything else is
//! rejected, never defaulted.
//!
//! `Direction` names the two mirrored generation modes: marshal (`set_`,
//! native to JSON) and unmarshal (`get_`, JSON to native).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// The kind of a schema field, from its `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A native boolean member.
    Bool,
    /// A native integer member.
    Int,
    /// A native fixed-size character buffer.
    String,
    /// A JSON array of nested objects, one per validity-tracked element.
    Array,
    /// A nested JSON object, either composite or the `empty` sentinel.
    Object,
}

/// Total number of field kinds.
pub const FIELD_KIND_COUNT: usize = 5;

impl FieldKind {
    /// Returns all field kinds in schema documentation order.
    pub fn all() -> &'static [FieldKind] {
        &[Self::Bool, Self::Int, Self::String, Self::Array, Self::Object]
    }

    /// The `type` attribute spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Whether this kind owns a `members` list.
    pub fn is_container(&self) -> bool {
        match self {
            Self::Array | Self::Object => true,
            Self::Bool | Self::Int | Self::String => false,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = CoreError;

    /// Parse the `type` attribute. Case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            "string" => Ok(Self::String),
            "array" => Ok(Self::Array),
            "object" => Ok(Self::Object),
            other => Err(CoreError::UnknownFieldKind(other.to_string())),
        }
    }
}

/// A code-generation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Native to JSON (`set_<field>`).
    Marshal,
    /// JSON to native (`get_<field>`).
    Unmarshal,
}

impl Direction {
    /// Both directions, marshal first (emission order).
    pub fn both() -> [Direction; 2] {
        [Self::Marshal, Self::Unmarshal]
    }

    /// Accessor name prefix: `set` or `get`.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Marshal => "set",
            Self::Unmarshal => "get",
        }
    }

    /// Name of the JSON handle parameter in generated accessors.
    pub fn handle(&self) -> &'static str {
        match self {
            Self::Marshal => "out",
            Self::Unmarshal => "in",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Marshal => f.write_str("marshal"),
            Self::Unmarshal => f.write_str("unmarshal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_count() {
        assert_eq!(FieldKind::all().len(), FIELD_KIND_COUNT);
    }

    #[test]
    fn test_as_str_roundtrip() {
        for kind in FieldKind::all() {
            let parsed: FieldKind = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        for bad in ["float", "Int", "", "uint8", "struct"] {
            let err = bad.parse::<FieldKind>().unwrap_err();
            assert_eq!(err, CoreError::UnknownFieldKind(bad.to_string()));
        }
    }

    #[test]
    fn test_serde_matches_as_str() {
        for kind in FieldKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_containers() {
        assert!(FieldKind::Array.is_container());
        assert!(FieldKind::Object.is_container());
        assert!(!FieldKind::String.is_container());
    }

    #[test]
    fn test_direction_prefixes() {
        assert_eq!(Direction::Marshal.prefix(), "set");
        assert_eq!(Direction::Unmarshal.prefix(), "get");
        assert_eq!(Direction::Marshal.handle(), "out");
        assert_eq!(Direction::Unmarshal.handle(), "in");
        assert_eq!(Direction::both(), [Direction::Marshal, Direction::Unmarshal]);
    }
}
