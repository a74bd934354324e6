//! # Accessor Emitters
//!
//! One [`ClassEmitter`] per class turns schema fields into C++ member
//! functions. Every accessor has the same signature shape,
//!
//! ```text
//! int set_<field>(<rest_type> out, <KeyStruct>& key, <ValStruct>& val)
//! int get_<field>(<rest_type> in, <KeyStruct>& key, <ValStruct>& val)
//! ```
//!
//! so a parent wrapper or an aggregate method can invoke any child the same
//! way. Dispatch is an exhaustive match over (shape, direction): adding a
//! field kind without deciding both directions does not compile.
//!
//! - `scalar`: bool, int and string accessors.
//! - `array`: array marshal.
//! - `object`: presence objects (`members = empty`) and composite wrappers.
//! - `aggregate`: the class-level `set_method` / `get_method`.

mod aggregate;
mod array;
mod object;
mod scalar;

use restc_core::{Direction, Identifier, Support};
use restc_schema::{ClassDef, FieldId, FieldShape, ObjectMembers, Schema};

use crate::contract::{REST_OP_SUCCESS, UNC_RC_GENERIC_ERROR, UNC_RC_SUCCESS, UNC_VF_INVALID, UNC_VF_VALID};
use crate::error::CodegenError;

const INDENT: &str = "  ";

/// Indentation-aware line buffer.
#[derive(Debug, Clone, Default)]
pub struct CodeBuffer {
    lines: Vec<String>,
    depth: usize,
}

impl CodeBuffer {
    /// Empty buffer at column zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffer whose lines start `depth` levels in.
    pub fn with_depth(depth: usize) -> Self {
        Self {
            lines: Vec::new(),
            depth,
        }
    }

    /// Append one line at the current depth. Empty text yields an empty line.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{text}", INDENT.repeat(self.depth)));
        }
    }

    /// Append a line and indent everything after it.
    pub fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedent and append a closing line.
    pub fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// Append another buffer's lines verbatim.
    pub fn extend(&mut self, other: CodeBuffer) {
        self.lines.extend(other.lines);
    }

    /// Lines written so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take the lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Emits every accessor and aggregate of one class.
pub struct ClassEmitter<'a> {
    schema: &'a Schema,
    class: &'a ClassDef,
}

impl<'a> ClassEmitter<'a> {
    /// Emitter for `class`, which must belong to `schema`.
    pub fn new(schema: &'a Schema, class: &'a ClassDef) -> Self {
        Self { schema, class }
    }

    /// Accessors for `direction` (children before parents, each field once)
    /// followed by the aggregate method, if the class declares one.
    pub fn emit_direction(&self, direction: Direction, out: &mut CodeBuffer) -> Result<(), CodegenError> {
        let Some(plan) = self.class.plan(direction) else {
            tracing::debug!(class = %self.class.name, %direction, "no aggregate declared");
            return Ok(());
        };
        for &id in &plan.members {
            let field = self.schema.field(id);
            if field.support(direction) == Support::Omit {
                tracing::warn!(
                    class = %self.class.name,
                    field = %field.name,
                    %direction,
                    "top-level field has {}_support=no and is skipped",
                    direction.prefix()
                );
            }
        }
        for id in self.schema.accessor_order(&plan.members, direction) {
            self.accessor(id, direction, out)?;
            out.line("");
        }
        self.aggregate(&plan.method, &plan.members, direction, out);
        out.line("");
        Ok(())
    }

    /// One field's accessor in `direction`.
    pub fn accessor(&self, id: FieldId, direction: Direction, out: &mut CodeBuffer) -> Result<(), CodegenError> {
        let field = self.schema.field(id);
        let name = field.accessor(direction);
        match field.support(direction) {
            Support::Omit => {
                tracing::debug!(field = %field.name, %direction, "accessor omitted");
                return Ok(());
            }
            Support::Abstract => {
                tracing::debug!(accessor = %name, "emitting override stub");
                out.open(format!("virtual {} {{", self.signature(&name, direction)));
                out.line(format!("return {UNC_RC_SUCCESS};"));
                out.close("}");
                return Ok(());
            }
            Support::Generate => {}
        }

        tracing::debug!(accessor = %name, kind = %field.shape.kind(), "emitting accessor");
        out.open(format!("{} {{", self.signature(&name, direction)));
        match (&field.shape, direction) {
            (FieldShape::Bool { member } | FieldShape::Int { member }, Direction::Marshal) => {
                self.marshal_value(id, field.json_key.as_str(), member, out);
            }
            (FieldShape::Bool { member } | FieldShape::Int { member }, Direction::Unmarshal) => {
                self.unmarshal_value(id, field.json_key.as_str(), member, out);
            }
            (FieldShape::String { member, validity }, Direction::Marshal) => {
                self.marshal_string(id, field.json_key.as_str(), member, validity.as_ref(), out);
            }
            (FieldShape::String { member, validity }, Direction::Unmarshal) => {
                self.unmarshal_string(id, field.json_key.as_str(), member, validity.as_ref(), out);
            }
            (FieldShape::Array { elements }, Direction::Marshal) => {
                self.marshal_array(field.json_key.as_str(), elements, out)?;
            }
            (FieldShape::Array { .. }, Direction::Unmarshal) => {
                return Err(CodegenError::Unsupported {
                    field: field.name.to_string(),
                    kind: field.shape.kind(),
                    direction,
                });
            }
            (
                FieldShape::Object {
                    members: ObjectMembers::Empty,
                    validity: Some(bit),
                },
                direction,
            ) => {
                self.presence_object(id, field.json_key.as_str(), bit, direction, out);
            }
            (
                FieldShape::Object {
                    members: ObjectMembers::Empty,
                    validity: None,
                },
                _,
            ) => {
                return Err(CodegenError::Shape {
                    field: field.name.to_string(),
                    message: "presence object without a validity bit".to_string(),
                });
            }
            (
                FieldShape::Object {
                    members: ObjectMembers::Composite(members),
                    ..
                },
                direction,
            ) => {
                self.composite_object(field.json_key.as_str(), members, direction, out);
            }
        }
        out.close("}");
        Ok(())
    }

    fn signature(&self, name: &str, direction: Direction) -> String {
        format!(
            "int {name}({} {}, {}& key, {}& val)",
            self.class.rest_type,
            direction.handle(),
            self.class.key_struct,
            self.class.val_struct
        )
    }

    /// `key` or `val`, whichever parameter the field is bound to.
    fn bound(&self, id: FieldId) -> &'static str {
        self.class.binding(id).param()
    }

    /// Invoke each participating member's accessor against `handle`,
    /// returning the generic error on the first failure.
    fn invoke_members(&self, members: &[FieldId], direction: Direction, handle: &str, out: &mut CodeBuffer) {
        for &member in members {
            let field = self.schema.field(member);
            if !field.support(direction).is_invoked() {
                continue;
            }
            out.open(format!(
                "if ({UNC_RC_SUCCESS} != {}({handle}, key, val)) {{",
                field.accessor(direction)
            ));
            out.line(format!("return {UNC_RC_GENERIC_ERROR};"));
            out.close("}");
        }
    }

    fn return_on_op_failure(out: &mut CodeBuffer) {
        out.open(format!("if ({REST_OP_SUCCESS} != ret) {{"));
        out.line(format!("return {UNC_RC_GENERIC_ERROR};"));
        out.close("}");
    }

    /// Set `<bound>.valid[<bit>]` to VALID when `valid_when` holds, else INVALID.
    fn assign_validity(bound: &str, bit: &Identifier, valid_when: &str, out: &mut CodeBuffer) {
        out.open(format!("if ({valid_when}) {{"));
        out.line(format!("{bound}.valid[{bit}] = {UNC_VF_VALID};"));
        out.close("} else {");
        out.depth += 1;
        out.line(format!("{bound}.valid[{bit}] = {UNC_VF_INVALID};"));
        out.close("}");
    }
}
