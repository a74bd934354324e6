//! Array marshal.
//!
//! Each declared element is a validity-tracked object. An element is built
//! inline from its members' accessors and appended only when its bit is
//! VALID, so the JSON array length equals the number of set bits.

use restc_core::Direction;
use restc_schema::{FieldId, FieldShape, ObjectMembers};

use super::{ClassEmitter, CodeBuffer};
use crate::contract::{call, UNC_RC_SUCCESS, UNC_VF_VALID};
use crate::error::CodegenError;

impl ClassEmitter<'_> {
    pub(super) fn marshal_array(&self, key: &str, elements: &[FieldId], out: &mut CodeBuffer) -> Result<(), CodegenError> {
        let rest_type = &self.class.rest_type;
        out.line(format!("{rest_type} array = {};", call("create_json_array_obj", "")));
        for &element in elements {
            let field = self.schema.field(element);
            if !field.set_support.is_invoked() {
                continue;
            }
            let FieldShape::Object {
                members: ObjectMembers::Composite(members),
                validity: Some(bit),
            } = &field.shape
            else {
                return Err(CodegenError::Shape {
                    field: field.name.to_string(),
                    message: "array elements must be objects with members and a validity bit".to_string(),
                });
            };
            let bound = self.bound(element);
            out.open(format!("if ({UNC_VF_VALID} == {bound}.valid[{bit}]) {{"));
            out.line(format!("{rest_type} element = {};", call("create_json_obj", "")));
            self.invoke_members(members, Direction::Marshal, "element", out);
            out.line(format!("{};", call("add_to_array", "array, element")));
            out.close("}");
        }
        out.line(format!(
            "int ret = {};",
            call("build", &format!("\"{key}\", array, {}", Direction::Marshal.handle()))
        ));
        Self::return_on_op_failure(out);
        out.line(format!("return {UNC_RC_SUCCESS};"));
        Ok(())
    }
}
