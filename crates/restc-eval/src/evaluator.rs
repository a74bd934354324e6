//! # Evaluator
//!
//! Executes one class's accessors and aggregates over the runtime model with
//! the same control flow the emitters write into generated headers:
//!
//! - build/parse results other than success become the generic error,
//! - validity bits are written by string emptiness and presence-object presence,
//! - array elements are appended only when their bit is VALID, while a
//!   composite object outside an array is always built,
//! - aggregates and composite wrappers stop at the first failing member.
//!
//! A native member the schema names but the structure lacks fails the
//! accessor with the generic error.

use std::collections::HashMap;

use restc_core::{Direction, Identifier, Support};
use restc_schema::{ClassDef, Field, FieldId, FieldShape, ObjectMembers, Schema};

use crate::error::EvalError;
use crate::native::{NativePair, NativeValue};
use crate::runtime::{JsonBuildParse, JsonObject, ResponseCode};

type StubFn = Box<dyn Fn(&mut NativePair) -> ResponseCode>;

/// Runs one class of a schema.
pub struct Evaluator<'a> {
    schema: &'a Schema,
    class: &'a ClassDef,
    overrides: HashMap<String, StubFn>,
    calls: Vec<String>,
}

impl<'a> Evaluator<'a> {
    /// Evaluator for the class named `class`.
    pub fn new(schema: &'a Schema, class: &str) -> Result<Self, EvalError> {
        let class = schema
            .class(class)
            .ok_or_else(|| EvalError::UnknownClass(class.to_string()))?;
        Ok(Self {
            schema,
            class,
            overrides: HashMap::new(),
            calls: Vec::new(),
        })
    }

    /// The class being evaluated.
    pub fn class(&self) -> &ClassDef {
        self.class
    }

    /// Replace an abstract stub's body. Stubs without an override succeed.
    pub fn override_stub(
        &mut self,
        accessor: &str,
        stub: impl Fn(&mut NativePair) -> ResponseCode + 'static,
    ) -> Result<(), EvalError> {
        let unknown = || EvalError::UnknownAccessor {
            class: self.class.name.to_string(),
            accessor: accessor.to_string(),
        };
        let (direction, field_name) = Direction::both()
            .into_iter()
            .find_map(|d| {
                accessor
                    .strip_prefix(d.prefix())
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| (d, rest))
            })
            .ok_or_else(unknown)?;
        let id = self.schema.lookup(field_name).ok_or_else(unknown)?;
        let reachable = self.class.plan(direction).is_some_and(|plan| {
            self.schema
                .accessor_order(&plan.members, direction)
                .contains(&id)
        });
        if !reachable {
            return Err(unknown());
        }
        if self.schema.field(id).support(direction) != Support::Abstract {
            return Err(EvalError::NotAbstract(accessor.to_string()));
        }
        self.overrides.insert(accessor.to_string(), Box::new(stub));
        Ok(())
    }

    /// Accessors and aggregates invoked so far, in call order.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Forget the call log.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Run the marshal aggregate into a fresh JSON object.
    pub fn marshal(&mut self, natives: &mut NativePair) -> Result<(ResponseCode, JsonObject), EvalError> {
        let class = self.class;
        let plan = class.set.as_ref().ok_or_else(|| EvalError::NoAggregate {
            class: class.name.to_string(),
            direction: Direction::Marshal,
        })?;
        self.calls.push(plan.method.to_string());
        let mut out = JsonBuildParse::create_json_obj();
        let code = self.invoke_set(&plan.members, &mut out, natives)?;
        tracing::debug!(class = %class.name, %code, "evaluated marshal aggregate");
        Ok((code, out))
    }

    /// Run the unmarshal aggregate over `input`.
    pub fn unmarshal(&mut self, input: &JsonObject, natives: &mut NativePair) -> Result<ResponseCode, EvalError> {
        let class = self.class;
        let plan = class.get.as_ref().ok_or_else(|| EvalError::NoAggregate {
            class: class.name.to_string(),
            direction: Direction::Unmarshal,
        })?;
        self.calls.push(plan.method.to_string());
        let code = self.invoke_get(&plan.members, input, natives)?;
        tracing::debug!(class = %class.name, %code, "evaluated unmarshal aggregate");
        Ok(code)
    }

    fn invoke_set(
        &mut self,
        members: &[FieldId],
        out: &mut JsonObject,
        natives: &mut NativePair,
    ) -> Result<ResponseCode, EvalError> {
        for &member in members {
            if !self.schema.field(member).set_support.is_invoked() {
                continue;
            }
            if self.set_field(member, out, natives)? != ResponseCode::Success {
                return Ok(ResponseCode::GenericError);
            }
        }
        Ok(ResponseCode::Success)
    }

    fn invoke_get(
        &mut self,
        members: &[FieldId],
        input: &JsonObject,
        natives: &mut NativePair,
    ) -> Result<ResponseCode, EvalError> {
        for &member in members {
            if !self.schema.field(member).get_support.is_invoked() {
                continue;
            }
            if self.get_field(member, input, natives)? != ResponseCode::Success {
                return Ok(ResponseCode::GenericError);
            }
        }
        Ok(ResponseCode::Success)
    }

    /// Log the call and report whether the generated body should run.
    fn enter(&mut self, field: &Field, direction: Direction, natives: &mut NativePair) -> Option<ResponseCode> {
        let name = field.accessor(direction);
        self.calls.push(name.clone());
        match field.support(direction) {
            Support::Generate => None,
            Support::Omit => Some(ResponseCode::Success),
            Support::Abstract => Some(
                self.overrides
                    .get(&name)
                    .map_or(ResponseCode::Success, |stub| stub(natives)),
            ),
        }
    }

    fn set_field(&mut self, id: FieldId, out: &mut JsonObject, natives: &mut NativePair) -> Result<ResponseCode, EvalError> {
        let schema = self.schema;
        let field = schema.field(id);
        if let Some(code) = self.enter(field, Direction::Marshal, natives) {
            return Ok(code);
        }
        let bound = self.class.binding(id);
        let key = field.json_key.as_str();

        let code = match &field.shape {
            FieldShape::Bool { member } => match natives.bound(bound).bool(member.as_str()) {
                Some(b) => ResponseCode::from_op(JsonBuildParse::build(key, b, out)),
                None => missing(field, member),
            },
            FieldShape::Int { member } => match natives.bound(bound).int(member.as_str()) {
                Some(n) => ResponseCode::from_op(JsonBuildParse::build(key, n, out)),
                None => missing(field, member),
            },
            FieldShape::String { member, validity } => {
                let Some(value) = natives.bound(bound).string(member.as_str()).map(str::to_string) else {
                    return Ok(missing(field, member));
                };
                if !JsonBuildParse::build(key, value.as_str(), out).is_success() {
                    return Ok(ResponseCode::GenericError);
                }
                if let Some(bit) = validity {
                    natives.bound_mut(bound).set_valid(bit.as_str(), !value.is_empty());
                }
                ResponseCode::Success
            }
            FieldShape::Array { elements } => {
                let mut array = JsonBuildParse::create_json_array_obj();
                for &element in elements {
                    let el = schema.field(element);
                    if !el.set_support.is_invoked() {
                        continue;
                    }
                    let FieldShape::Object {
                        members: ObjectMembers::Composite(members),
                        validity: Some(bit),
                    } = &el.shape
                    else {
                        return Err(unsupported(el, Direction::Marshal));
                    };
                    if !natives.bound(self.class.binding(element)).is_valid(bit.as_str()) {
                        continue;
                    }
                    let mut obj = JsonBuildParse::create_json_obj();
                    if self.invoke_set(members, &mut obj, natives)? != ResponseCode::Success {
                        return Ok(ResponseCode::GenericError);
                    }
                    JsonBuildParse::add_to_array(&mut array, obj);
                }
                ResponseCode::from_op(JsonBuildParse::build(key, array, out))
            }
            FieldShape::Object {
                members: ObjectMembers::Empty,
                validity,
            } => match validity {
                Some(bit) if natives.bound(bound).is_valid(bit.as_str()) => {
                    ResponseCode::from_op(JsonBuildParse::build(key, JsonBuildParse::create_json_obj(), out))
                }
                Some(_) => ResponseCode::Success,
                None => return Err(unsupported(field, Direction::Marshal)),
            },
            FieldShape::Object {
                members: ObjectMembers::Composite(members),
                ..
            } => {
                let mut nested = JsonBuildParse::create_json_obj();
                if self.invoke_set(members, &mut nested, natives)? != ResponseCode::Success {
                    return Ok(ResponseCode::GenericError);
                }
                ResponseCode::from_op(JsonBuildParse::build(key, nested, out))
            }
        };
        Ok(code)
    }

    fn get_field(&mut self, id: FieldId, input: &JsonObject, natives: &mut NativePair) -> Result<ResponseCode, EvalError> {
        let schema = self.schema;
        let field = schema.field(id);
        if let Some(code) = self.enter(field, Direction::Unmarshal, natives) {
            return Ok(code);
        }
        let bound = self.class.binding(id);
        let key = field.json_key.as_str();

        let code = match &field.shape {
            FieldShape::Bool { member } => {
                let Some(mut current) = natives.bound(bound).bool(member.as_str()) else {
                    return Ok(missing(field, member));
                };
                if !JsonBuildParse::parse_bool(input, key, &mut current).is_success() {
                    return Ok(ResponseCode::GenericError);
                }
                natives.bound_mut(bound).store(member.as_str(), NativeValue::Bool(current));
                ResponseCode::Success
            }
            FieldShape::Int { member } => {
                let Some(mut current) = natives.bound(bound).int(member.as_str()) else {
                    return Ok(missing(field, member));
                };
                if !JsonBuildParse::parse_int(input, key, &mut current).is_success() {
                    return Ok(ResponseCode::GenericError);
                }
                natives.bound_mut(bound).store(member.as_str(), NativeValue::Int(current));
                ResponseCode::Success
            }
            FieldShape::String { member, validity } => {
                let native = natives.bound_mut(bound);
                if native.string(member.as_str()).is_none() {
                    return Ok(missing(field, member));
                }
                let mut value = String::new();
                let max_len = native.max_len(member.as_str());
                if !JsonBuildParse::parse_string(input, key, max_len, &mut value).is_success() {
                    return Ok(ResponseCode::GenericError);
                }
                if let Some(bit) = validity {
                    native.set_valid(bit.as_str(), !value.is_empty());
                }
                native.store(member.as_str(), NativeValue::Str(value));
                ResponseCode::Success
            }
            FieldShape::Array { .. } => return Err(unsupported(field, Direction::Unmarshal)),
            FieldShape::Object {
                members: ObjectMembers::Empty,
                validity,
            } => {
                let Some(bit) = validity else {
                    return Err(unsupported(field, Direction::Unmarshal));
                };
                let mut nested = None;
                if !JsonBuildParse::parse_object(input, key, &mut nested).is_success() {
                    return Ok(ResponseCode::GenericError);
                }
                natives.bound_mut(bound).set_valid(bit.as_str(), nested.is_some());
                ResponseCode::Success
            }
            FieldShape::Object {
                members: ObjectMembers::Composite(members),
                ..
            } => {
                let mut nested = None;
                if !JsonBuildParse::parse_object(input, key, &mut nested).is_success() {
                    return Ok(ResponseCode::GenericError);
                }
                match nested {
                    Some(obj) => self.invoke_get(members, obj, natives)?,
                    None => ResponseCode::Success,
                }
            }
        };
        Ok(code)
    }
}

fn missing(field: &Field, member: &Identifier) -> ResponseCode {
    tracing::debug!(field = %field.name, %member, "native member missing");
    ResponseCode::GenericError
}

fn unsupported(field: &Field, direction: Direction) -> EvalError {
    EvalError::Unsupported {
        field: field.name.to_string(),
        kind: field.shape.kind(),
        direction,
    }
}
