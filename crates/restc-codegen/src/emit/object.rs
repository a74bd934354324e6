//! Nested object accessors.
//!
//! A presence object (`members = empty`) carries no data: marshal attaches an
//! empty object iff its bit is VALID, unmarshal sets the bit from presence.
//! A composite always wraps its members' accessors around a fresh nested
//! object; its validity bit, if any, only gates it as an array element.
//! An absent nested object on unmarshal is not an error; nothing is read.

use restc_core::{Direction, Identifier};
use restc_schema::FieldId;

use super::{ClassEmitter, CodeBuffer};
use crate::contract::{call, UNC_RC_SUCCESS, UNC_VF_VALID};

impl ClassEmitter<'_> {
    pub(super) fn presence_object(
        &self,
        id: FieldId,
        key: &str,
        bit: &Identifier,
        direction: Direction,
        out: &mut CodeBuffer,
    ) {
        let bound = self.bound(id);
        match direction {
            Direction::Marshal => {
                out.open(format!("if ({UNC_VF_VALID} == {bound}.valid[{bit}]) {{"));
                self.attach_nested(key, "nested", out);
                out.close("}");
            }
            Direction::Unmarshal => {
                self.parse_nested(key, out);
                Self::assign_validity(bound, bit, "NULL != nested", out);
            }
        }
        out.line(format!("return {UNC_RC_SUCCESS};"));
    }

    pub(super) fn composite_object(
        &self,
        key: &str,
        members: &[FieldId],
        direction: Direction,
        out: &mut CodeBuffer,
    ) {
        match direction {
            Direction::Marshal => {
                out.line(format!(
                    "{} nested = {};",
                    self.class.rest_type,
                    call("create_json_obj", "")
                ));
                self.invoke_members(members, direction, "nested", out);
                out.line(format!(
                    "int ret = {};",
                    call("build", &format!("\"{key}\", nested, {}", direction.handle()))
                ));
                Self::return_on_op_failure(out);
            }
            Direction::Unmarshal => {
                self.parse_nested(key, out);
                out.open("if (NULL == nested) {");
                out.line(format!("return {UNC_RC_SUCCESS};"));
                out.close("}");
                self.invoke_members(members, direction, "nested", out);
            }
        }
        out.line(format!("return {UNC_RC_SUCCESS};"));
    }

    /// Create an empty nested object and attach it under `key`.
    fn attach_nested(&self, key: &str, var: &str, out: &mut CodeBuffer) {
        out.line(format!(
            "{} {var} = {};",
            self.class.rest_type,
            call("create_json_obj", "")
        ));
        out.line(format!(
            "int ret = {};",
            call("build", &format!("\"{key}\", {var}, {}", Direction::Marshal.handle()))
        ));
        Self::return_on_op_failure(out);
    }

    /// Parse the nested object under `key` into `nested`, NULL when absent.
    fn parse_nested(&self, key: &str, out: &mut CodeBuffer) {
        out.line(format!("{} nested = NULL;", self.class.rest_type));
        out.line(format!(
            "int ret = {};",
            call("parse", &format!("{}, \"{key}\", 0, nested", Direction::Unmarshal.handle()))
        ));
        Self::return_on_op_failure(out);
    }
}
