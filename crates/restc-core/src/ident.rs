//! # Identifier Newtype
//!
//! A validated C++ identifier. Schema values flow into generated source
//! verbatim, so anything that becomes a symbol is checked here first: a
//! missing or malformed value is an error at schema-build time, never an
//! invalid token in a header.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// C++ keywords and alternative operator tokens (through C++20) that
/// cannot name a generated symbol.
const RESERVED: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "char8_t", "class", "co_await", "co_return",
    "co_yield", "compl", "concept", "const", "const_cast", "consteval", "constexpr", "constinit",
    "continue", "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum",
    "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if", "inline",
    "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq", "nullptr",
    "operator", "or", "or_eq", "private", "protected", "public", "register", "reinterpret_cast",
    "requires", "return", "short", "signed", "sizeof", "static", "static_assert", "static_cast",
    "struct", "switch", "template", "this", "thread_local", "throw", "true", "try", "typedef",
    "typeid", "typename", "union", "unsigned", "using", "virtual", "void", "volatile", "wchar_t",
    "while", "xor", "xor_eq",
];

/// A C++ identifier: `[A-Za-z_][A-Za-z0-9_]*`, not a reserved word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Validate `value` as an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIdentifier`] when the value is empty,
    /// starts with a digit, contains characters outside `[A-Za-z0-9_]`,
    /// or is a C++ keyword.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        let reason = if value.is_empty() {
            Some("empty")
        } else if value.starts_with(|c: char| c.is_ascii_digit()) {
            Some("starts with a digit")
        } else if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Some("contains characters outside [A-Za-z0-9_]")
        } else if RESERVED.contains(&value.as_str()) {
            Some("reserved C++ keyword")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(CoreError::InvalidIdentifier { value, reason }),
            None => Ok(Self(value)),
        }
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

impl std::str::FromStr for Identifier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
