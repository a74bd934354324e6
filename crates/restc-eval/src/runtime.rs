//! # JSON Runtime Model
//!
//! `serde_json` stand-ins for the build/parse facility generated headers call
//! into (`restjson::JsonBuildParse`) and for the native response codes.
//!
//! ## Parse Semantics
//!
//! - An absent key (or an explicit `null`) succeeds and leaves the output
//!   untouched.
//! - A present value of the wrong JSON type is [`JsonOpResult::TypeMismatch`].
//! - Strings are truncated to `max_len` characters.

use serde_json::{Map, Value};

/// JSON object handle.
pub type JsonObject = Map<String, Value>;

/// Result of a build or parse call (`REST_OP_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonOpResult {
    /// `REST_OP_SUCCESS`.
    Success,
    /// `REST_OP_FAILURE`.
    GenericError,
    /// `REST_OP_TYPE_MISMATCH`.
    TypeMismatch,
}

impl JsonOpResult {
    /// Whether generated code treats the call as successful.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Accessor and aggregate return code (`UNC_RC_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// `UNC_RC_SUCCESS`.
    Success,
    /// `UNC_RC_GENERIC_ERROR`.
    GenericError,
}

impl ResponseCode {
    /// Map a build/parse result the way every generated accessor does.
    pub fn from_op(result: JsonOpResult) -> Self {
        if result.is_success() {
            Self::Success
        } else {
            Self::GenericError
        }
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("UNC_RC_SUCCESS"),
            Self::GenericError => f.write_str("UNC_RC_GENERIC_ERROR"),
        }
    }
}

/// Model of `restjson::JsonBuildParse`.
pub struct JsonBuildParse;

impl JsonBuildParse {
    /// `create_json_obj()`.
    pub fn create_json_obj() -> JsonObject {
        JsonObject::new()
    }

    /// `create_json_array_obj()`.
    pub fn create_json_array_obj() -> Vec<Value> {
        Vec::new()
    }

    /// `add_to_array(array, obj)`.
    pub fn add_to_array(array: &mut Vec<Value>, obj: JsonObject) {
        array.push(Value::Object(obj));
    }

    /// `build(key, value, out)`: set `key` on `out`, replacing any previous value.
    pub fn build(key: &str, value: impl Into<Value>, out: &mut JsonObject) -> JsonOpResult {
        out.insert(key.to_string(), value.into());
        JsonOpResult::Success
    }

    /// `parse(in, key, sizeof, out)` for integer members.
    pub fn parse_int(input: &JsonObject, key: &str, out: &mut i64) -> JsonOpResult {
        match present(input, key) {
            None => JsonOpResult::Success,
            Some(value) => match value.as_i64() {
                Some(n) => {
                    *out = n;
                    JsonOpResult::Success
                }
                None => JsonOpResult::TypeMismatch,
            },
        }
    }

    /// `parse(in, key, sizeof, out)` for boolean members.
    pub fn parse_bool(input: &JsonObject, key: &str, out: &mut bool) -> JsonOpResult {
        match present(input, key) {
            None => JsonOpResult::Success,
            Some(Value::Bool(b)) => {
                *out = *b;
                JsonOpResult::Success
            }
            Some(_) => JsonOpResult::TypeMismatch,
        }
    }

    /// `parse(in, key, max_len, out)` into a `std::string`.
    pub fn parse_string(input: &JsonObject, key: &str, max_len: usize, out: &mut String) -> JsonOpResult {
        match present(input, key) {
            None => JsonOpResult::Success,
            Some(Value::String(s)) => {
                *out = s.chars().take(max_len).collect();
                JsonOpResult::Success
            }
            Some(_) => JsonOpResult::TypeMismatch,
        }
    }

    /// `parse(in, key, 0, nested)` for nested objects; `out` stays `None`
    /// when the key is absent.
    pub fn parse_object<'j>(input: &'j JsonObject, key: &str, out: &mut Option<&'j JsonObject>) -> JsonOpResult {
        match present(input, key) {
            None => JsonOpResult::Success,
            Some(Value::Object(obj)) => {
                *out = Some(obj);
                JsonOpResult::Success
            }
            Some(_) => JsonOpResult::TypeMismatch,
        }
    }
}

fn present<'j>(input: &'j JsonObject, key: &str) -> Option<&'j Value> {
    input.get(key).filter(|v| !v.is_null())
}
