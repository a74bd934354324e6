//! Behavioral properties of generated marshalling code, checked through the
//! reference evaluator.

use std::path::PathBuf;

use proptest::prelude::*;
use restc_eval::{EvalError, Evaluator, JsonObject, NativePair, NativeStruct, ResponseCode};
use restc_schema::{Schema, SchemaSource};
use serde_json::{json, Value};

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn vtn_schema() -> Schema {
    Schema::load(repo_root().join("schemas").join("vtn.ini")).unwrap()
}

fn inline_schema(text: &str) -> Schema {
    Schema::build(&SchemaSource::parse("inline.ini", text).unwrap()).unwrap()
}

fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(obj) => obj,
        other => panic!("not an object: {other}"),
    }
}

fn vtn_natives(
    name: &str,
    description: &str,
    admin: bool,
    mtu: i64,
    coordinator: bool,
    host: bool,
) -> NativePair {
    NativePair::new(
        NativeStruct::new().with_string("vtn_name", name, 32),
        NativeStruct::new()
            .with_string("description", description, 128)
            .with_bool("admin_status", admin)
            .with_int("mtu", mtu)
            .with_valid("VTN_COORDINATOR_VALID", coordinator)
            .with_valid("VTN_HOST_VALID", host)
            .with_string("host_name", "host1", 32)
            .with_int("host_port", 8080)
            .with_string("op_status", "", 16),
    )
}

fn empty_vtn_natives() -> NativePair {
    NativePair::new(
        NativeStruct::new().with_string("vtn_name", "", 32),
        NativeStruct::new()
            .with_string("description", "", 128)
            .with_bool("admin_status", false)
            .with_int("mtu", 0)
            .with_string("op_status", "", 16),
    )
}

const AGGREGATE: &str = "\
[code]
namespace = agg

[agg_class]
name = Agg
rest_type = json_object*
ipc_key_struct = AggKeyT
ipc_val_struct = AggValT
set_sections = a,b,c
set_method = set_all
get_sections = x,y,z
get_method = get_all

[DEFAULT]
set_support = no
set_abstract = yes

[a]
type = int
ipc_name = a

[b]
type = int
ipc_name = b

[c]
type = int
ipc_name = c

[x]
type = int
ipc_name = x

[y]
type = int
ipc_name = y

[z]
type = int
ipc_name = z
";

const ARRAY: &str = "\
[code]
namespace = arr

[ports_class]
name = Ports
rest_type = json_object*
ipc_key_struct = PortsKeyT
ipc_val_struct = PortsValT
set_sections = ports
set_method = set_ports_body

[ports]
type = array
members = p0,p1,p2
get_support = no

[p0]
type = object
members = n0
ipc_valid_flag = yes
ipc_valid_enum = P0_VALID

[p1]
type = object
members = n1
ipc_valid_flag = yes
ipc_valid_enum = P1_VALID

[p2]
type = object
members = n2
ipc_valid_flag = yes
ipc_valid_enum = P2_VALID

[n0]
type = int
key = port
ipc_name = n0

[n1]
type = int
key = port
ipc_name = n1

[n2]
type = int
key = port
ipc_name = n2
";

const TRACKED: &str = "\
[code]
namespace = tracked

[obj_class]
name = Holder
rest_type = json_object*
ipc_key_struct = HolderKeyT
ipc_val_struct = HolderValT
set_sections = obj
set_method = set_holder
get_sections = obj
get_method = get_holder

[obj]
type = object
members = n
ipc_valid_flag = yes
ipc_valid_enum = OBJ_VALID

[n]
type = int
ipc_name = n
";

#[test]
fn test_tracked_composite_attaches_regardless_of_bit() {
    let schema = inline_schema(TRACKED);
    let mut eval = Evaluator::new(&schema, "Holder").unwrap();
    let mut natives = NativePair::new(NativeStruct::new(), NativeStruct::new().with_int("n", 5));
    let (code, body) = eval.marshal(&mut natives).unwrap();
    assert_eq!(code, ResponseCode::Success);
    assert_eq!(Value::Object(body.clone()), json!({"obj": {"n": 5}}));

    let mut target = NativePair::new(NativeStruct::new(), NativeStruct::new().with_int("n", 0));
    let code = eval.unmarshal(&body, &mut target).unwrap();
    assert_eq!(code, ResponseCode::Success);
    assert_eq!(target.val.int("n"), Some(5));
    assert!(target.val.valid.is_empty());
}

#[test]
fn test_vtn_marshal_body() {
    let schema = vtn_schema();
    let mut eval = Evaluator::new(&schema, "Vtn").unwrap();
    let mut natives = vtn_natives("vtn1", "", true, 1500, true, false);
    let (code, body) = eval.marshal(&mut natives).unwrap();
    assert_eq!(code, ResponseCode::Success);
    assert_eq!(
        Value::Object(body),
        json!({
            "vtn": {
                "vtn_name": "vtn1",
                "description": "",
                "admin-status": true,
                "mtu": 1500,
                "coordinator": {},
                "hosts": []
            }
        })
    );
    assert!(!natives.val.is_valid("VTN_DESC_VALID"));
}

#[test]
fn test_abstract_stub_runs_override() {
    let schema = vtn_schema();
    let mut eval = Evaluator::new(&schema, "Vtn").unwrap();
    eval.override_stub("set_op_status", |natives| {
        natives.val.set_valid("OP_STATUS_SEEN", true);
        ResponseCode::Success
    })
    .unwrap();
    let mut natives = vtn_natives("vtn1", "d", false, 1, false, false);
    eval.marshal(&mut natives).unwrap();
    assert!(natives.val.is_valid("OP_STATUS_SEEN"));
    assert!(eval.calls().iter().any(|c| c == "set_op_status"));
}

#[test]
fn test_override_validation() {
    let schema = vtn_schema();
    let mut eval = Evaluator::new(&schema, "Vtn").unwrap();
    assert_eq!(
        eval.override_stub("set_vtn_name", |_| ResponseCode::Success),
        Err(EvalError::NotAbstract("set_vtn_name".into()))
    );
    assert!(matches!(
        eval.override_stub("set_nothing", |_| ResponseCode::Success),
        Err(EvalError::UnknownAccessor { .. })
    ));
    assert!(matches!(
        eval.override_stub("get_op_status", |_| ResponseCode::Success),
        Err(EvalError::NotAbstract(_))
    ));
    assert!(matches!(
        Evaluator::new(&schema, "Vbr"),
        Err(EvalError::UnknownClass(_))
    ));
}

#[test]
fn test_missing_native_member_fails_accessor() {
    let schema = vtn_schema();
    let mut eval = Evaluator::new(&schema, "Vtn").unwrap();
    let mut natives = vtn_natives("vtn1", "d", false, 1, false, false);
    natives.val.members.remove("mtu");
    let (code, _) = eval.marshal(&mut natives).unwrap();
    assert_eq!(code, ResponseCode::GenericError);
    assert!(!eval.calls().iter().any(|c| c == "set_coordinator"));
}

#[test]
fn test_summary_has_no_unmarshal_aggregate() {
    let schema = vtn_schema();
    let mut eval = Evaluator::new(&schema, "VtnSummary").unwrap();
    let mut natives = NativePair::default();
    assert!(matches!(
        eval.unmarshal(&JsonObject::new(), &mut natives),
        Err(EvalError::NoAggregate { .. })
    ));
}

#[test]
fn test_absent_nested_object_reads_nothing() {
    let schema = vtn_schema();
    let mut eval = Evaluator::new(&schema, "Vtn").unwrap();
    let mut natives = vtn_natives("keep", "keep", true, 9, true, false);
    let code = eval.unmarshal(&object(json!({})), &mut natives).unwrap();
    assert_eq!(code, ResponseCode::Success);
    assert_eq!(natives.key.string("vtn_name"), Some("keep"));
    assert_eq!(eval.calls(), ["get_vtn_body", "get_vtn"]);
}

#[test]
fn test_unmarshal_type_mismatch_short_circuits() {
    let schema = inline_schema(&AGGREGATE.replace("set_support = no\nset_abstract = yes\n", ""));
    let mut eval = Evaluator::new(&schema, "Agg").unwrap();
    let mut natives = NativePair::new(
        NativeStruct::new(),
        NativeStruct::new().with_int("x", 0).with_int("y", 0).with_int("z", 0),
    );
    let input = object(json!({"x": 1, "y": "two", "z": 3}));
    let code = eval.unmarshal(&input, &mut natives).unwrap();
    assert_eq!(code, ResponseCode::GenericError);
    assert_eq!(eval.calls(), ["get_all", "get_x", "get_y"]);
    assert_eq!(natives.val.int("x"), Some(1));
    assert_eq!(natives.val.int("z"), Some(0));
}

proptest! {
    #[test]
    fn round_trip_restores_native_values(
        name in "[a-z0-9_]{0,31}",
        description in "[ -~]{0,127}",
        admin in any::<bool>(),
        mtu in any::<i64>(),
        coordinator in any::<bool>(),
        host in any::<bool>(),
    ) {
        let schema = vtn_schema();
        let mut eval = Evaluator::new(&schema, "Vtn").unwrap();
        let mut source = vtn_natives(&name, &description, admin, mtu, coordinator, host);
        let (code, body) = eval.marshal(&mut source).unwrap();
        prop_assert_eq!(code, ResponseCode::Success);
        prop_assert_eq!(source.val.is_valid("VTN_DESC_VALID"), !description.is_empty());

        let vtn = body.get("vtn").and_then(Value::as_object).unwrap();
        prop_assert_eq!(vtn.contains_key("coordinator"), coordinator);
        let hosts = vtn.get("hosts").and_then(Value::as_array).unwrap();
        prop_assert_eq!(hosts.len(), usize::from(host));

        let mut target = empty_vtn_natives();
        let code = eval.unmarshal(&body, &mut target).unwrap();
        prop_assert_eq!(code, ResponseCode::Success);
        prop_assert_eq!(target.key.string("vtn_name"), Some(name.as_str()));
        prop_assert_eq!(target.val.string("description"), Some(description.as_str()));
        prop_assert_eq!(target.val.is_valid("VTN_DESC_VALID"), !description.is_empty());
        prop_assert_eq!(target.val.bool("admin_status"), Some(admin));
        prop_assert_eq!(target.val.int("mtu"), Some(mtu));
        prop_assert_eq!(target.val.is_valid("VTN_COORDINATOR_VALID"), coordinator);
    }

    #[test]
    fn array_length_counts_valid_elements(bits in proptest::array::uniform3(any::<bool>())) {
        let schema = inline_schema(ARRAY);
        let mut eval = Evaluator::new(&schema, "Ports").unwrap();
        let mut val = NativeStruct::new();
        for (i, bit) in bits.iter().enumerate() {
            val = val
                .with_valid(&format!("P{i}_VALID"), *bit)
                .with_int(&format!("n{i}"), i as i64);
        }
        let mut natives = NativePair::new(NativeStruct::new(), val);
        let (code, body) = eval.marshal(&mut natives).unwrap();
        prop_assert_eq!(code, ResponseCode::Success);
        let ports = body.get("ports").and_then(Value::as_array).unwrap();
        prop_assert_eq!(ports.len(), bits.iter().filter(|b| **b).count());
        let expected: Vec<Value> = bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(|(i, _)| json!({"port": i}))
            .collect();
        prop_assert_eq!(ports, &expected);
    }

    #[test]
    fn aggregate_stops_at_first_failure(fail_at in 0usize..3) {
        let schema = inline_schema(AGGREGATE);
        let mut eval = Evaluator::new(&schema, "Agg").unwrap();
        let names = ["set_a", "set_b", "set_c"];
        eval.override_stub(names[fail_at], |_| ResponseCode::GenericError).unwrap();
        let mut natives = NativePair::default();
        let (code, body) = eval.marshal(&mut natives).unwrap();
        prop_assert_eq!(code, ResponseCode::GenericError);
        prop_assert!(body.is_empty());
        let mut expected = vec!["set_all"];
        expected.extend_from_slice(&names[..=fail_at]);
        prop_assert_eq!(eval.calls(), expected.as_slice());
    }

    #[test]
    fn presence_object_attached_iff_valid(valid in any::<bool>()) {
        let schema = vtn_schema();
        let mut eval = Evaluator::new(&schema, "Vtn").unwrap();
        let mut natives = vtn_natives("v", "d", false, 0, valid, false);
        let (_, body) = eval.marshal(&mut natives).unwrap();
        let vtn = body.get("vtn").and_then(Value::as_object).unwrap();
        prop_assert_eq!(vtn.get("coordinator").is_some(), valid);
        if valid {
            prop_assert_eq!(vtn.get("coordinator"), Some(&json!({})));
        }
    }
}
