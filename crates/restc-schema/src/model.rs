//! # Schema Graph
//!
//! An explicit, validated, immutable graph built once per schema source.
//! Field nodes live in an arena addressed by [`FieldId`]; a field referenced
//! by several parents is a single node reached through several edges.
//!
//! Construction resolves everything the emitters need before any code is
//! generated:
//!
//! - every `members` / `*_sections` reference (dangling references fail here),
//! - every field kind (unknown kinds and unimplemented kind/direction pairs
//!   fail here),
//! - every symbol that lands in generated source (as an [`Identifier`]),
//! - the key-vs-val [`BoundTo`] decision for every (class, field) pair,
//! - member cycles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use restc_core::{parse_flag, BoundTo, Direction, FieldKind, Identifier, Support};

use crate::error::{ResolutionError, SchemaError};
use crate::source::{split_list, SchemaSource, Section, SectionRole};

/// `members` value marking an object with no concrete members.
pub const EMPTY_MEMBERS: &str = "empty";

/// Index of a field node in a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

impl FieldId {
    /// Position in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Members of an `object` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectMembers {
    /// The `empty` sentinel: a bare nested object gated by the validity bit.
    Empty,
    /// Ordered child fields.
    Composite(Vec<FieldId>),
}

/// Kind-specific content of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldShape {
    /// Native boolean member.
    Bool {
        /// Native member name (`ipc_name`).
        member: Identifier,
    },
    /// Native integer member.
    Int {
        /// Native member name (`ipc_name`).
        member: Identifier,
    },
    /// Native character buffer, optionally validity-tracked.
    String {
        /// Native member name (`ipc_name`).
        member: Identifier,
        /// Validity bit (`ipc_valid_enum`) when `ipc_valid_flag=yes`.
        validity: Option<Identifier>,
    },
    /// JSON array built from validity-tracked element objects.
    Array {
        /// Element fields, each an `object` with a validity bit.
        elements: Vec<FieldId>,
    },
    /// Nested JSON object.
    Object {
        /// Members or the `empty` sentinel.
        members: ObjectMembers,
        /// Validity bit when `ipc_valid_flag=yes` (always present for `Empty`).
        validity: Option<Identifier>,
    },
}

impl FieldShape {
    /// The field kind this shape was built from.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Bool { .. } => FieldKind::Bool,
            Self::Int { .. } => FieldKind::Int,
            Self::String { .. } => FieldKind::String,
            Self::Array { .. } => FieldKind::Array,
            Self::Object { .. } => FieldKind::Object,
        }
    }
}

/// One validated schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Section name; accessors are named `set_<name>` / `get_<name>`.
    pub name: Identifier,
    /// JSON object key (`key`, defaulting to the section name).
    pub json_key: String,
    /// Native structure the storage lives in (`ipc_struct`).
    pub ipc_struct: Option<String>,
    /// Kind-specific content.
    pub shape: FieldShape,
    /// Marshal participation.
    pub set_support: Support,
    /// Unmarshal participation.
    pub get_support: Support,
}

impl Field {
    /// Participation in `direction`.
    pub fn support(&self, direction: Direction) -> Support {
        match direction {
            Direction::Marshal => self.set_support,
            Direction::Unmarshal => self.get_support,
        }
    }

    /// Validity bit identifier, for kinds that track one.
    pub fn validity(&self) -> Option<&Identifier> {
        match &self.shape {
            FieldShape::String { validity, .. } | FieldShape::Object { validity, .. } => {
                validity.as_ref()
            }
            FieldShape::Bool { .. } | FieldShape::Int { .. } | FieldShape::Array { .. } => None,
        }
    }

    /// Direct children in declared order (empty for scalars and `empty` objects).
    pub fn children(&self) -> &[FieldId] {
        match &self.shape {
            FieldShape::Array { elements } => elements,
            FieldShape::Object {
                members: ObjectMembers::Composite(members),
                ..
            } => members,
            FieldShape::Object {
                members: ObjectMembers::Empty,
                ..
            }
            | FieldShape::Bool { .. }
            | FieldShape::Int { .. }
            | FieldShape::String { .. } => &[],
        }
    }

    /// Accessor name in `direction` (`set_<name>` / `get_<name>`).
    pub fn accessor(&self, direction: Direction) -> String {
        format!("{}_{}", direction.prefix(), self.name)
    }
}

/// Aggregate method plan for one direction of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatePlan {
    /// Aggregate method name (`set_method` / `get_method`).
    pub method: Identifier,
    /// Top-level members in declared order.
    pub members: Vec<FieldId>,
}

/// One output class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    /// Section name the class was read from.
    pub section: String,
    /// Output class identifier (`name`).
    pub name: Identifier,
    /// JSON handle type threaded through every accessor (`rest_type`).
    pub rest_type: String,
    /// Key structure type (`ipc_key_struct`).
    pub key_struct: Identifier,
    /// Val structure type (`ipc_val_struct`).
    pub val_struct: Identifier,
    /// Marshal aggregate, when `set_sections` is declared.
    pub set: Option<AggregatePlan>,
    /// Unmarshal aggregate, when `get_sections` is declared.
    pub get: Option<AggregatePlan>,
    bindings: HashMap<FieldId, BoundTo>,
}

impl ClassDef {
    /// Aggregate plan for `direction`.
    pub fn plan(&self, direction: Direction) -> Option<&AggregatePlan> {
        match direction {
            Direction::Marshal => self.set.as_ref(),
            Direction::Unmarshal => self.get.as_ref(),
        }
    }

    /// Native binding of a field reachable from this class.
    ///
    /// Fields outside the class fall back to the val struct, matching the
    /// rule for an absent `ipc_struct`.
    pub fn binding(&self, field: FieldId) -> BoundTo {
        self.bindings.get(&field).copied().unwrap_or(BoundTo::Val)
    }

    /// Native struct type name for a binding.
    pub fn struct_for(&self, bound: BoundTo) -> &Identifier {
        match bound {
            BoundTo::Key => &self.key_struct,
            BoundTo::Val => &self.val_struct,
        }
    }
}

/// A validated schema source.
#[derive(Debug, Clone)]
pub struct Schema {
    path: PathBuf,
    namespace: Identifier,
    classes: Vec<ClassDef>,
    fields: Vec<Field>,
    by_name: HashMap<String, FieldId>,
}

impl Schema {
    /// Open a schema source and build its graph.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let source = SchemaSource::open(path)?;
        Self::build(&source)
    }

    /// Build and validate the graph for an already-parsed source.
    pub fn build(source: &SchemaSource) -> Result<Self, SchemaError> {
        let mut builder = Builder {
            source,
            path: source.path(),
            fields: Vec::new(),
            by_name: HashMap::new(),
            visiting: Vec::new(),
        };

        let mut code_sections = Vec::new();
        let mut class_sections = Vec::new();
        let mut field_sections = Vec::new();
        for name in source.section_names() {
            match source.role(name)? {
                Some(SectionRole::Code) => code_sections.push(name),
                Some(SectionRole::Class) => class_sections.push(name),
                Some(SectionRole::Field) => field_sections.push(name),
                None => tracing::debug!(section = name, "ignoring section without a role"),
            }
        }

        let code = match code_sections.as_slice() {
            [one] => *one,
            [] => return Err(SchemaError::invalid(source.path(), "-", "no code section (a section defining 'namespace')")),
            many => {
                return Err(SchemaError::invalid(
                    source.path(),
                    many[1],
                    format!("more than one code section: [{}]", many.join("], [")),
                ))
            }
        };
        let code_section = source.read(code)?;
        let namespace = identifier(source.path(), &code_section, "namespace")?;

        if class_sections.is_empty() {
            return Err(SchemaError::invalid(
                source.path(),
                "-",
                "no class section (a section defining 'name' or 'ipc_key_struct')",
            ));
        }

        let mut classes = Vec::with_capacity(class_sections.len());
        for section in class_sections {
            classes.push(builder.class(section)?);
        }
        for section in field_sections {
            if !builder.by_name.contains_key(section) {
                tracing::debug!(section, "validating field section no class reaches");
                builder.field(section, section)?;
            }
        }

        let schema = Self {
            path: source.path().to_path_buf(),
            namespace,
            classes,
            fields: builder.fields,
            by_name: builder.by_name,
        };
        for class in &schema.classes {
            schema.check_class(class)?;
        }

        tracing::debug!(
            path = %schema.path.display(),
            classes = schema.classes.len(),
            fields = schema.fields.len(),
            "built schema graph"
        );
        Ok(schema)
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Declared namespace (emitted as `unc::<namespace>`).
    pub fn namespace(&self) -> &Identifier {
        &self.namespace
    }

    /// Classes in file order.
    pub fn classes(&self) -> &[ClassDef] {
        &self.classes
    }

    /// Look up a class by its output name.
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.name.as_str() == name)
    }

    /// Field node by id.
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    /// Field id by section name.
    pub fn lookup(&self, name: &str) -> Option<FieldId> {
        self.by_name.get(name).copied()
    }

    /// Number of field nodes reachable from any class.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Fields reachable from `roots` through invoked accessors in
    /// `direction`, children before parents, each at most once.
    ///
    /// This is the emission order: a nested accessor always precedes the
    /// accessor that attaches it to its parent. Array elements contribute
    /// their members but no accessor of their own.
    pub fn accessor_order(&self, roots: &[FieldId], direction: Direction) -> Vec<FieldId> {
        let mut seen = vec![false; self.fields.len()];
        let mut order = Vec::new();
        for &root in roots {
            self.visit(root, direction, &mut seen, &mut order);
        }
        order
    }

    fn visit(&self, id: FieldId, direction: Direction, seen: &mut [bool], order: &mut Vec<FieldId>) {
        if seen[id.0] {
            return;
        }
        let field = self.field(id);
        match field.support(direction) {
            Support::Omit => return,
            Support::Abstract => {}
            Support::Generate => {
                let elements_inline = matches!(field.shape, FieldShape::Array { .. });
                for &child in field.children() {
                    if elements_inline {
                        let element = self.field(child);
                        if element.support(direction) == Support::Omit {
                            continue;
                        }
                        for &member in element.children() {
                            self.visit(member, direction, seen, order);
                        }
                    } else {
                        self.visit(child, direction, seen, order);
                    }
                }
            }
        }
        seen[id.0] = true;
        order.push(id);
    }

    fn check_class(&self, class: &ClassDef) -> Result<(), SchemaError> {
        for direction in Direction::both() {
            let Some(plan) = class.plan(direction) else {
                continue;
            };
            let order = self.accessor_order(&plan.members, direction);
            for &id in &order {
                let field = self.field(id);
                if direction == Direction::Unmarshal
                    && field.get_support == Support::Generate
                    && matches!(field.shape, FieldShape::Array { .. })
                {
                    return Err(SchemaError::UnsupportedFieldKind {
                        path: self.path.clone(),
                        field: field.name.to_string(),
                        kind: FieldKind::Array.to_string(),
                        direction: Some(Direction::Unmarshal),
                    });
                }
                if field.accessor(direction) == plan.method.as_str() {
                    return Err(SchemaError::invalid(
                        &self.path,
                        &class.section,
                        format!(
                            "aggregate method '{}' collides with the accessor of field [{}]",
                            plan.method, field.name
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

struct Builder<'a> {
    source: &'a SchemaSource,
    path: &'a Path,
    fields: Vec<Field>,
    by_name: HashMap<String, FieldId>,
    visiting: Vec<String>,
}

impl Builder<'_> {
    fn class(&mut self, section_name: &str) -> Result<ClassDef, SchemaError> {
        let section = self.source.read(section_name)?;
        let name = identifier(self.path, &section, "name")?;
        let rest_type = section.require("rest_type")?.to_string();
        if rest_type.is_empty()
            || !rest_type
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "_:*& <>".contains(c))
        {
            return Err(SchemaError::invalid(
                self.path,
                section_name,
                format!("rest_type {rest_type:?} is not a C++ type"),
            ));
        }
        let key_struct = identifier(self.path, &section, "ipc_key_struct")?;
        let val_struct = identifier(self.path, &section, "ipc_val_struct")?;

        let set = self.plan(&section, "set_sections", "set_method")?;
        let get = self.plan(&section, "get_sections", "get_method")?;

        let mut bindings = HashMap::new();
        let roots: Vec<FieldId> = set
            .iter()
            .chain(get.iter())
            .flat_map(|p| p.members.iter().copied())
            .collect();
        let mut stack = roots;
        while let Some(id) = stack.pop() {
            if bindings.contains_key(&id) {
                continue;
            }
            let field = &self.fields[id.0];
            bindings.insert(
                id,
                BoundTo::resolve(field.ipc_struct.as_deref(), key_struct.as_str()),
            );
            stack.extend(field.children().iter().copied());
        }

        tracing::debug!(class = %name, fields = bindings.len(), "resolved class bindings");

        Ok(ClassDef {
            section: section_name.to_string(),
            name,
            rest_type,
            key_struct,
            val_struct,
            set,
            get,
            bindings,
        })
    }

    fn plan(
        &mut self,
        section: &Section,
        sections_key: &str,
        method_key: &str,
    ) -> Result<Option<AggregatePlan>, SchemaError> {
        let (Some(list), method) = (section.get(sections_key)?, section.get(method_key)?) else {
            if section.get(method_key)?.is_some() {
                return Err(SchemaError::invalid(
                    self.path,
                    section.name(),
                    format!("'{method_key}' declared without '{sections_key}'"),
                ));
            }
            return Ok(None);
        };
        let Some(method) = method else {
            return Err(ResolutionError::KeyNotFound {
                path: self.path.to_path_buf(),
                section: section.name().to_string(),
                key: method_key.to_string(),
            }
            .into());
        };
        let method = Identifier::new(method)
            .map_err(|e| SchemaError::invalid(self.path, section.name(), format!("{method_key}: {e}")))?;
        let mut members = Vec::new();
        for member in split_list(list) {
            members.push(self.field(member, section.name())?);
        }
        Ok(Some(AggregatePlan { method, members }))
    }

    fn field(&mut self, name: &str, referrer: &str) -> Result<FieldId, SchemaError> {
        if let Some(&id) = self.by_name.get(name) {
            return Ok(id);
        }
        if self.visiting.iter().any(|v| v == name) {
            let mut chain = self.visiting.clone();
            chain.push(name.to_string());
            return Err(SchemaError::Cycle {
                path: self.path.to_path_buf(),
                chain: chain.join(" -> "),
            });
        }

        let section = self.source.read(name).map_err(|e| match e {
            ResolutionError::SectionNotFound { path, section } => ResolutionError::UnresolvedMember {
                path,
                referrer: referrer.to_string(),
                member: section,
            },
            other => other,
        })?;
        if self.source.role(name)? != Some(SectionRole::Field) {
            return Err(SchemaError::invalid(
                self.path,
                referrer,
                format!("member [{name}] is not a field section (no 'type' key)"),
            ));
        }

        self.visiting.push(name.to_string());
        let field = self.build_field(&section);
        self.visiting.pop();
        let field = field?;

        let id = FieldId(self.fields.len());
        tracing::trace!(field = name, kind = %field.shape.kind(), "resolved field");
        self.fields.push(field);
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    fn build_field(&mut self, section: &Section) -> Result<Field, SchemaError> {
        let path = self.path;
        let name_str = section.name();
        let invalid = |message: String| SchemaError::invalid(path, name_str, message);

        let type_str = section.require("type")?;
        let kind: FieldKind = type_str.parse().map_err(|_| SchemaError::UnsupportedFieldKind {
            path: path.to_path_buf(),
            field: name_str.to_string(),
            kind: type_str.to_string(),
            direction: None,
        })?;
        let name = Identifier::new(name_str).map_err(|e| invalid(format!("field name: {e}")))?;

        let json_key = section.get("key")?.unwrap_or(name_str).to_string();
        if json_key.is_empty() || json_key.chars().any(|c| c == '"' || c == '\\' || c.is_control()) {
            return Err(invalid(format!(
                "JSON key {json_key:?} cannot be emitted as a string literal"
            )));
        }
        let ipc_struct = section.get("ipc_struct")?.map(str::to_string);

        let tracked = parse_flag("ipc_valid_flag", section.get("ipc_valid_flag")?, false)
            .map_err(|e| invalid(e.to_string()))?;
        let validity = if tracked {
            Some(identifier(path, section, "ipc_valid_enum")?)
        } else {
            None
        };

        let support = |dir: &str| -> Result<Support, SchemaError> {
            let support_key = format!("{dir}_support");
            let abstract_key = format!("{dir}_abstract");
            Support::from_flags(
                &support_key,
                section.get(&support_key)?,
                &abstract_key,
                section.get(&abstract_key)?,
            )
            .map_err(|e| invalid(e.to_string()))
        };
        let set_support = support("set")?;
        let get_support = support("get")?;

        if !kind.is_container() && section.get("members")?.is_some() {
            tracing::warn!(field = name_str, kind = %kind, "members is ignored on {kind} fields");
        }

        let shape = match kind {
            FieldKind::Bool | FieldKind::Int => {
                if validity.is_some() {
                    tracing::warn!(
                        field = name_str,
                        kind = %kind,
                        "ipc_valid_flag has no effect on {kind} fields"
                    );
                }
                let member = identifier(path, section, "ipc_name")?;
                if kind == FieldKind::Bool {
                    FieldShape::Bool { member }
                } else {
                    FieldShape::Int { member }
                }
            }
            FieldKind::String => FieldShape::String {
                member: identifier(path, section, "ipc_name")?,
                validity,
            },
            FieldKind::Array => {
                let list = section.require("members")?;
                let names = split_list(list);
                if names.is_empty() || list.trim() == EMPTY_MEMBERS {
                    return Err(invalid("array fields need at least one element section".into()));
                }
                let mut elements = Vec::with_capacity(names.len());
                for element in names {
                    let id = self.field(element, name_str)?;
                    let el = &self.fields[id.0];
                    let tracked_object = matches!(
                        el.shape,
                        FieldShape::Object {
                            members: ObjectMembers::Composite(_),
                            validity: Some(_),
                        }
                    );
                    if !tracked_object {
                        return Err(invalid(format!(
                            "array element [{element}] must be an object with members and ipc_valid_flag=yes"
                        )));
                    }
                    elements.push(id);
                }
                FieldShape::Array { elements }
            }
            FieldKind::Object => {
                let list = section.require("members")?;
                if list.trim() == EMPTY_MEMBERS {
                    if validity.is_none() {
                        return Err(invalid(
                            "an object with members=empty needs ipc_valid_flag=yes".into(),
                        ));
                    }
                    FieldShape::Object {
                        members: ObjectMembers::Empty,
                        validity,
                    }
                } else {
                    let names = split_list(list);
                    if names.is_empty() {
                        return Err(invalid("object members list is blank".into()));
                    }
                    let mut members = Vec::with_capacity(names.len());
                    for member in names {
                        members.push(self.field(member, name_str)?);
                    }
                    FieldShape::Object {
                        members: ObjectMembers::Composite(members),
                        validity,
                    }
                }
            }
        };

        Ok(Field {
            name,
            json_key,
            ipc_struct,
            shape,
            set_support,
            get_support,
        })
    }
}

fn identifier(path: &Path, section: &Section, key: &str) -> Result<Identifier, SchemaError> {
    let raw = section.require(key)?;
    Identifier::new(raw).map_err(|e| SchemaError::invalid(path, section.name(), format!("{key}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VTN: &str = "\
[code]
namespace = vtndrvintf

[vtn_class]
name = Vtn
rest_type = json_object*
ipc_key_struct = VtnKeyT
ipc_val_struct = VtnValT
set_sections = vtn
get_sections = vtn
set_method = set_vtn_body
get_method = get_vtn_body

[vtn]
type = object
key = vtn
members = vtn_name,description

[vtn_name]
type = string
key = vtn_name
ipc_name = vtn_name
ipc_struct = VtnKeyT

[description]
type = string
key = description
ipc_name = description
ipc_struct = VtnValT
ipc_valid_flag = yes
ipc_valid_enum = VTN_DESC_VALID
";

    fn build(text: &str) -> Result<Schema, SchemaError> {
        Schema::build(&SchemaSource::parse("vtn.ini", text)?)
    }

    #[test]
    fn builds_graph_with_bindings() {
        let schema = build(VTN).unwrap();
        assert_eq!(schema.namespace().as_str(), "vtndrvintf");
        let class = schema.class("Vtn").unwrap();
        let vtn_name = schema.lookup("vtn_name").unwrap();
        let description = schema.lookup("description").unwrap();
        assert_eq!(class.binding(vtn_name), BoundTo::Key);
        assert_eq!(class.binding(description), BoundTo::Val);
        assert_eq!(
            schema.field(description).validity().map(Identifier::as_str),
            Some("VTN_DESC_VALID")
        );
        assert_eq!(schema.field(vtn_name).validity(), None);
        assert_eq!(class.struct_for(BoundTo::Key).as_str(), "VtnKeyT");
    }

    #[test]
    fn accessor_order_puts_children_first() {
        let schema = build(VTN).unwrap();
        let class = schema.class("Vtn").unwrap();
        let plan = class.plan(Direction::Marshal).unwrap();
        let names: Vec<String> = schema
            .accessor_order(&plan.members, Direction::Marshal)
            .into_iter()
            .map(|id| schema.field(id).name.to_string())
            .collect();
        assert_eq!(names, ["vtn_name", "description", "vtn"]);
    }

    #[test]
    fn dangling_member_is_a_resolution_error() {
        let text = VTN.replace("members = vtn_name,description", "members = vtn_name,descr");
        let err = build(&text).unwrap_err();
        match err {
            SchemaError::Resolution(ResolutionError::UnresolvedMember { referrer, member, .. }) => {
                assert_eq!(referrer, "vtn");
                assert_eq!(member, "descr");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_type_is_unsupported_kind() {
        let text = VTN.replace("type = string\nkey = vtn_name", "type = float\nkey = vtn_name");
        let err = build(&text).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnsupportedFieldKind { ref kind, direction: None, .. } if kind == "float"
        ));
    }

    #[test]
    fn valid_flag_without_enum_is_missing_key() {
        let text = VTN.replace("ipc_valid_enum = VTN_DESC_VALID\n", "");
        let err = build(&text).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Resolution(ResolutionError::KeyNotFound { ref key, .. }) if key == "ipc_valid_enum"
        ));
    }

    #[test]
    fn cycles_are_rejected() {
        let text = VTN.replace("members = vtn_name,description", "members = vtn_name,vtn");
        let err = build(&text).unwrap_err();
        match err {
            SchemaError::Cycle { chain, .. } => assert_eq!(chain, "vtn -> vtn"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn shared_fields_are_one_node() {
        let text = format!(
            "{VTN}\n[vtn2]\ntype = object\nmembers = vtn_name\n"
        )
        .replace("set_sections = vtn", "set_sections = vtn,vtn2");
        let schema = build(&text).unwrap();
        let plan = schema.class("Vtn").unwrap().plan(Direction::Marshal).unwrap();
        let order = schema.accessor_order(&plan.members, Direction::Marshal);
        let names: Vec<&str> = order.iter().map(|id| schema.field(*id).name.as_str()).collect();
        assert_eq!(names, ["vtn_name", "description", "vtn", "vtn2"]);
        assert_eq!(schema.field_count(), 4);
    }

    #[test]
    fn array_unmarshal_is_rejected() {
        let text = format!(
            "{VTN}\n[hosts]\ntype = array\nmembers = host\n\n\
             [host]\ntype = object\nipc_valid_flag = yes\nipc_valid_enum = HOST_VALID\nmembers = vtn_name\n"
        )
        .replace("get_sections = vtn", "get_sections = vtn,hosts");
        let err = build(&text).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnsupportedFieldKind { ref field, direction: Some(Direction::Unmarshal), .. }
                if field == "hosts"
        ));
    }

    #[test]
    fn array_marshal_only_is_accepted() {
        let text = format!(
            "{VTN}\n[hosts]\ntype = array\nmembers = host\nget_support = no\n\n\
             [host]\ntype = object\nipc_valid_flag = yes\nipc_valid_enum = HOST_VALID\nmembers = vtn_name\n"
        )
        .replace("set_sections = vtn", "set_sections = vtn,hosts")
        .replace("get_sections = vtn", "get_sections = vtn,hosts");
        let schema = build(&text).unwrap();
        let plan = schema.class("Vtn").unwrap().plan(Direction::Unmarshal).unwrap();
        let order = schema.accessor_order(&plan.members, Direction::Unmarshal);
        assert!(!order.contains(&schema.lookup("hosts").unwrap()));
    }

    #[test]
    fn untracked_array_elements_are_rejected() {
        let text = format!(
            "{VTN}\n[hosts]\ntype = array\nmembers = vtn_name\nget_support = no\n"
        )
        .replace("set_sections = vtn", "set_sections = vtn,hosts");
        let err = build(&text).unwrap_err();
        assert!(err.to_string().contains("array element [vtn_name]"));
    }

    #[test]
    fn empty_object_requires_validity() {
        let text = format!("{VTN}\n[flags]\ntype = object\nmembers = empty\n")
            .replace("set_sections = vtn", "set_sections = vtn,flags");
        let err = build(&text).unwrap_err();
        assert!(err.to_string().contains("members=empty"));
    }

    #[test]
    fn invalid_identifiers_are_rejected() {
        let text = VTN.replace("ipc_name = description", "ipc_name = desc ription");
        let err = build(&text).unwrap_err();
        assert!(matches!(err, SchemaError::Invalid { ref section, .. } if section == "description"));
    }

    #[test]
    fn method_collision_is_rejected() {
        let text = VTN.replace("set_method = set_vtn_body", "set_method = set_vtn");
        let err = build(&text).unwrap_err();
        assert!(err.to_string().contains("collides"));
    }

    #[test]
    fn missing_code_section_is_rejected() {
        let text = VTN.replace("[code]\nnamespace = vtndrvintf\n", "");
        let err = build(&text).unwrap_err();
        assert!(err.to_string().contains("no code section"));
    }

    #[test]
    fn partial_class_section_is_a_missing_key() {
        let text = format!(
            "{VTN}\n[summary_class]\nname = VtnSummary\nrest_type = json_object*\n\
             ipc_val_struct = VtnValT\nset_sections = vtn\nset_method = set_summary_body\n"
        );
        let err = build(&text).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Resolution(ResolutionError::KeyNotFound { ref section, ref key, .. })
                if section == "summary_class" && key == "ipc_key_struct"
        ));
    }

    #[test]
    fn class_without_name_is_a_missing_key() {
        let text = VTN.replace("name = Vtn\n", "");
        let err = build(&text).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Resolution(ResolutionError::KeyNotFound { ref key, .. }) if key == "name"
        ));
    }

    #[test]
    fn unreferenced_field_sections_are_validated() {
        let text = format!("{VTN}\n[spare]\ntype = float\nipc_name = spare\n");
        let err = build(&text).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnsupportedFieldKind { ref kind, .. } if kind == "float"
        ));

        let text = format!("{VTN}\n[spare]\ntype = object\nmembers = vtn_name,gone\n");
        let err = build(&text).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Resolution(ResolutionError::UnresolvedMember { ref referrer, ref member, .. })
                if referrer == "spare" && member == "gone"
        ));
    }

    #[test]
    fn unreferenced_field_sections_are_not_emitted() {
        let text = format!("{VTN}\n[spare]\ntype = int\nipc_name = spare\n");
        let schema = build(&text).unwrap();
        let spare = schema.lookup("spare").unwrap();
        let plan = schema.class("Vtn").unwrap().plan(Direction::Marshal).unwrap();
        assert!(!schema.accessor_order(&plan.members, Direction::Marshal).contains(&spare));
    }

    #[test]
    fn omitted_fields_are_not_visited() {
        let text = VTN.replace(
            "ipc_valid_enum = VTN_DESC_VALID\n",
            "ipc_valid_enum = VTN_DESC_VALID\nset_support = no\n",
        );
        let schema = build(&text).unwrap();
        let plan = schema.class("Vtn").unwrap().plan(Direction::Marshal).unwrap();
        let order = schema.accessor_order(&plan.members, Direction::Marshal);
        assert!(!order.contains(&schema.lookup("description").unwrap()));
    }
}
