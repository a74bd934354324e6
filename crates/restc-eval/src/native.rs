//! # Native Structures
//!
//! A [`NativeStruct`] stands in for one key or val structure: named members,
//! per-member buffer capacities for character arrays, and the validity
//! bitmap addressed by enum identifier. Fixtures deserialize straight into
//! [`NativePair`].

use std::collections::BTreeMap;

use restc_core::BoundTo;
use serde::{Deserialize, Serialize};

/// One native member value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NativeValue {
    /// `bool` member.
    Bool(bool),
    /// Integer member.
    Int(i64),
    /// Character buffer.
    Str(String),
}

/// A native key or val structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeStruct {
    /// Member values by `ipc_name`.
    #[serde(default)]
    pub members: BTreeMap<String, NativeValue>,
    /// `sizeof` of character buffer members. Absent means unbounded.
    #[serde(default)]
    pub capacities: BTreeMap<String, usize>,
    /// Validity bitmap by enum identifier. Absent bits read as INVALID.
    #[serde(default)]
    pub valid: BTreeMap<String, bool>,
}

impl NativeStruct {
    /// Empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: integer member.
    pub fn with_int(mut self, member: &str, value: i64) -> Self {
        self.members.insert(member.to_string(), NativeValue::Int(value));
        self
    }

    /// Builder: bool member.
    pub fn with_bool(mut self, member: &str, value: bool) -> Self {
        self.members.insert(member.to_string(), NativeValue::Bool(value));
        self
    }

    /// Builder: character buffer of `capacity` bytes holding `value`.
    pub fn with_string(mut self, member: &str, value: &str, capacity: usize) -> Self {
        self.capacities.insert(member.to_string(), capacity);
        self.members.insert(member.to_string(), NativeValue::Str(String::new()));
        self.store_string(member, value);
        self
    }

    /// Builder: validity bit.
    pub fn with_valid(mut self, bit: &str, valid: bool) -> Self {
        self.set_valid(bit, valid);
        self
    }

    /// Current member value.
    pub fn member(&self, member: &str) -> Option<&NativeValue> {
        self.members.get(member)
    }

    /// Integer member, if present with that type.
    pub fn int(&self, member: &str) -> Option<i64> {
        match self.members.get(member) {
            Some(NativeValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Bool member, if present with that type.
    pub fn bool(&self, member: &str) -> Option<bool> {
        match self.members.get(member) {
            Some(NativeValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// String member, if present with that type.
    pub fn string(&self, member: &str) -> Option<&str> {
        match self.members.get(member) {
            Some(NativeValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Characters a parse into `member` may read: `sizeof - 1`.
    pub fn max_len(&self, member: &str) -> usize {
        self.capacities
            .get(member)
            .map_or(usize::MAX, |cap| cap.saturating_sub(1))
    }

    /// Overwrite a member, keeping its type. Returns `false` when the member
    /// does not exist or has a different type.
    pub fn store(&mut self, member: &str, value: NativeValue) -> bool {
        if let NativeValue::Str(s) = &value {
            return self.store_string(member, s);
        }
        match self.members.get_mut(member) {
            Some(slot) if std::mem::discriminant(slot) == std::mem::discriminant(&value) => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    /// `strncpy` into a character buffer: at most `sizeof - 1` characters.
    fn store_string(&mut self, member: &str, value: &str) -> bool {
        let bounded: String = value.chars().take(self.max_len(member)).collect();
        match self.members.get_mut(member) {
            Some(NativeValue::Str(slot)) => {
                *slot = bounded;
                true
            }
            _ => false,
        }
    }

    /// `valid[bit] == UNC_VF_VALID`.
    pub fn is_valid(&self, bit: &str) -> bool {
        self.valid.get(bit).copied().unwrap_or(false)
    }

    /// `valid[bit] = valid ? UNC_VF_VALID : UNC_VF_INVALID`.
    pub fn set_valid(&mut self, bit: &str, valid: bool) {
        self.valid.insert(bit.to_string(), valid);
    }
}

/// The key and val structures threaded through every accessor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativePair {
    /// Key structure.
    #[serde(default)]
    pub key: NativeStruct,
    /// Val structure.
    #[serde(default)]
    pub val: NativeStruct,
}

impl NativePair {
    /// Pair from its two halves.
    pub fn new(key: NativeStruct, val: NativeStruct) -> Self {
        Self { key, val }
    }

    /// The structure a binding selects.
    pub fn bound(&self, bound: BoundTo) -> &NativeStruct {
        match bound {
            BoundTo::Key => &self.key,
            BoundTo::Val => &self.val,
        }
    }

    /// Mutable access to the structure a binding selects.
    pub fn bound_mut(&mut self, bound: BoundTo) -> &mut NativeStruct {
        match bound {
            BoundTo::Key => &mut self.key,
            BoundTo::Val => &mut self.val,
        }
    }
}
