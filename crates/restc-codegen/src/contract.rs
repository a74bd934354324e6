//! # Downstream Runtime Contract
//!
//! Symbols the generated headers call into. The runtime itself lives outside
//! this repository; `restc-eval` models the same contract in-process.

/// JSON build/parse facility.
pub const JSON_BUILD_PARSE: &str = "restjson::JsonBuildParse";

/// Successful build/parse result.
pub const REST_OP_SUCCESS: &str = "restjson::REST_OP_SUCCESS";

/// Accessor/aggregate success response code.
pub const UNC_RC_SUCCESS: &str = "UNC_RC_SUCCESS";

/// Accessor/aggregate failure response code.
pub const UNC_RC_GENERIC_ERROR: &str = "UNC_RC_GENERIC_ERROR";

/// Validity bitmap value for a populated field.
pub const UNC_VF_VALID: &str = "UNC_VF_VALID";

/// Validity bitmap value for an unpopulated field.
pub const UNC_VF_INVALID: &str = "UNC_VF_INVALID";

/// Include directives every generated header starts with.
pub const INCLUDES: &[&str] = &[
    "#include <cstring>",
    "#include <string>",
    "#include \"json_build_parse.hh\"",
    "#include \"unc/keytype.h\"",
    "#include \"unc/upll_ipc_enum.h\"",
];

/// Outermost namespace of every generated header.
pub const ROOT_NAMESPACE: &str = "unc";

/// `JsonBuildParse::<op>(args)` call expression.
pub fn call(op: &str, args: &str) -> String {
    format!("{JSON_BUILD_PARSE}::{op}({args})")
}
