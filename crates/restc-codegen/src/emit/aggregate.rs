//! Class-level aggregate methods.
//!
//! Top-level members run left to right; the first failure returns the generic
//! error and later members are never invoked. Nothing is rolled back.

use restc_core::{Direction, Identifier};
use restc_schema::FieldId;

use super::{ClassEmitter, CodeBuffer};
use crate::contract::UNC_RC_SUCCESS;

impl ClassEmitter<'_> {
    pub(super) fn aggregate(&self, method: &Identifier, members: &[FieldId], direction: Direction, out: &mut CodeBuffer) {
        tracing::debug!(class = %self.class.name, method = %method, %direction, "emitting aggregate");
        out.open(format!("{} {{", self.signature(method.as_str(), direction)));
        self.invoke_members(members, direction, direction.handle(), out);
        out.line(format!("return {UNC_RC_SUCCESS};"));
        out.close("}");
    }
}
