//! Integration test: load the checked-in `schemas/` sources and walk the
//! resulting graphs.

use std::path::PathBuf;

use restc_core::{BoundTo, Direction, FieldKind, Support};
use restc_schema::{FieldShape, ObjectMembers, Schema, SchemaSource, SectionRole};

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn vtn() -> Schema {
    Schema::load(repo_root().join("schemas").join("vtn.ini")).unwrap()
}

#[test]
fn test_every_checked_in_schema_loads() {
    let dir = repo_root().join("schemas");
    let mut count = 0;
    for entry in std::fs::read_dir(&dir).unwrap().flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "ini") {
            Schema::load(&path).unwrap_or_else(|e| panic!("{e}"));
            count += 1;
        }
    }
    assert!(count >= 1, "no schemas under {}", dir.display());
}

#[test]
fn test_section_roles() {
    let source = SchemaSource::open(repo_root().join("schemas").join("vtn.ini")).unwrap();
    assert_eq!(source.role("code").unwrap(), Some(SectionRole::Code));
    assert_eq!(source.role("vtn_class").unwrap(), Some(SectionRole::Class));
    assert_eq!(source.role("vtn_name").unwrap(), Some(SectionRole::Field));
    assert!(!source.contains("DEFAULT"));
}

#[test]
fn test_classes_in_file_order() {
    let schema = vtn();
    let names: Vec<&str> = schema.classes().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Vtn", "VtnSummary"]);
    let vtn = schema.class("Vtn").unwrap();
    assert_eq!(vtn.rest_type, "json_object*");
    assert_eq!(vtn.key_struct.as_str(), "VtnKeyT");
    assert_eq!(vtn.val_struct.as_str(), "VtnValT");
    assert_eq!(vtn.set.as_ref().unwrap().method.as_str(), "set_vtn_body");
    assert!(schema.class("VtnSummary").unwrap().get.is_none());
}

#[test]
fn test_field_shapes() {
    let schema = vtn();
    let kind = |name: &str| schema.field(schema.lookup(name).unwrap()).shape.kind();
    assert_eq!(kind("admin_status"), FieldKind::Bool);
    assert_eq!(kind("mtu"), FieldKind::Int);
    assert_eq!(kind("hosts"), FieldKind::Array);

    let coordinator = schema.field(schema.lookup("coordinator").unwrap());
    assert!(matches!(
        coordinator.shape,
        FieldShape::Object {
            members: ObjectMembers::Empty,
            validity: Some(_)
        }
    ));

    let admin = schema.field(schema.lookup("admin_status").unwrap());
    assert_eq!(admin.json_key, "admin-status");

    let op_status = schema.field(schema.lookup("op_status").unwrap());
    assert_eq!(op_status.set_support, Support::Abstract);
    assert_eq!(op_status.get_support, Support::Generate);
}

#[test]
fn test_binding_differs_between_classes() {
    let schema = vtn();
    let vtn_name = schema.lookup("vtn_name").unwrap();
    assert_eq!(schema.class("Vtn").unwrap().binding(vtn_name), BoundTo::Key);
    assert_eq!(schema.class("VtnSummary").unwrap().binding(vtn_name), BoundTo::Val);
}

#[test]
fn test_unmarshal_order_skips_omitted_array() {
    let schema = vtn();
    let plan = schema.class("Vtn").unwrap().get.clone().unwrap();
    let names: Vec<String> = schema
        .accessor_order(&plan.members, Direction::Unmarshal)
        .into_iter()
        .map(|id| schema.field(id).name.to_string())
        .collect();
    assert_eq!(
        names,
        ["vtn_name", "description", "admin_status", "mtu", "coordinator", "op_status", "vtn"]
    );
}
