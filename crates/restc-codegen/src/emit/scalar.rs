//! Bool, int and string accessors.
//!
//! Values are built directly from, and parsed directly into, the bound native
//! member. Strings go through a local `std::string` so the validity bit can
//! be derived from emptiness; the copy back into the native buffer is bounded
//! by `sizeof(member) - 1`.

use restc_core::{Direction, Identifier};
use restc_schema::FieldId;

use super::{ClassEmitter, CodeBuffer};
use crate::contract::{call, UNC_RC_SUCCESS};

impl ClassEmitter<'_> {
    pub(super) fn marshal_value(&self, id: FieldId, key: &str, member: &Identifier, out: &mut CodeBuffer) {
        let bound = self.bound(id);
        out.line(format!(
            "int ret = {};",
            call("build", &format!("\"{key}\", {bound}.{member}, {}", Direction::Marshal.handle()))
        ));
        Self::return_on_op_failure(out);
        out.line(format!("return {UNC_RC_SUCCESS};"));
    }

    pub(super) fn unmarshal_value(&self, id: FieldId, key: &str, member: &Identifier, out: &mut CodeBuffer) {
        let bound = self.bound(id);
        out.line(format!(
            "int ret = {};",
            call(
                "parse",
                &format!(
                    "{}, \"{key}\", sizeof({bound}.{member}), {bound}.{member}",
                    Direction::Unmarshal.handle()
                )
            )
        ));
        Self::return_on_op_failure(out);
        out.line(format!("return {UNC_RC_SUCCESS};"));
    }

    pub(super) fn marshal_string(
        &self,
        id: FieldId,
        key: &str,
        member: &Identifier,
        validity: Option<&Identifier>,
        out: &mut CodeBuffer,
    ) {
        let bound = self.bound(id);
        out.line(format!(
            "std::string value(reinterpret_cast<const char*>({bound}.{member}));"
        ));
        out.line(format!(
            "int ret = {};",
            call("build", &format!("\"{key}\", value, {}", Direction::Marshal.handle()))
        ));
        Self::return_on_op_failure(out);
        if let Some(bit) = validity {
            Self::assign_validity(bound, bit, "!value.empty()", out);
        }
        out.line(format!("return {UNC_RC_SUCCESS};"));
    }

    pub(super) fn unmarshal_string(
        &self,
        id: FieldId,
        key: &str,
        member: &Identifier,
        validity: Option<&Identifier>,
        out: &mut CodeBuffer,
    ) {
        let bound = self.bound(id);
        let capacity = format!("sizeof({bound}.{member}) - 1");
        out.line("std::string value;");
        out.line(format!(
            "int ret = {};",
            call(
                "parse",
                &format!("{}, \"{key}\", {capacity}, value", Direction::Unmarshal.handle())
            )
        ));
        Self::return_on_op_failure(out);
        if let Some(bit) = validity {
            Self::assign_validity(bound, bit, "!value.empty()", out);
        }
        out.line(format!(
            "strncpy(reinterpret_cast<char*>({bound}.{member}), value.c_str(), {capacity});"
        ));
        out.line(format!("return {UNC_RC_SUCCESS};"));
    }
}
