//! # Preview Subcommand
//!
//! Runs one class's marshal aggregate through the reference evaluator and
//! prints the resulting JSON body. The native fixture is JSON:
//!
//! ```json
//! {
//!   "key": {"members": {"vtn_name": "vtn1"}, "capacities": {"vtn_name": 32}},
//!   "val": {"members": {"mtu": 1500}, "valid": {"VTN_COORDINATOR_VALID": true}}
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use restc_eval::{Evaluator, NativePair, ResponseCode};
use restc_schema::Schema;

/// Arguments for the `preview` subcommand.
#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Schema source containing the class.
    pub source: PathBuf,

    /// Class name (`name` in the class section).
    #[arg(long)]
    pub class: String,

    /// JSON fixture holding the key and val structures.
    #[arg(long, value_name = "FILE")]
    pub native: PathBuf,
}

/// Marshal a fixture and return the rendered body with the aggregate's
/// response code.
pub fn render_preview(source: &Path, class: &str, native: &Path) -> Result<(ResponseCode, String)> {
    let schema = Schema::load(source)?;
    let text = std::fs::read_to_string(native)
        .with_context(|| format!("reading native fixture: {}", native.display()))?;
    let mut natives: NativePair = serde_json::from_str(&text)
        .with_context(|| format!("invalid native fixture: {}", native.display()))?;
    let mut evaluator = Evaluator::new(&schema, class)?;
    let (code, body) = evaluator.marshal(&mut natives)?;
    tracing::debug!(calls = ?evaluator.calls(), "preview call log");
    let rendered = serde_json::to_string_pretty(&serde_json::Value::Object(body))?;
    Ok((code, rendered))
}

/// Execute the preview subcommand.
pub fn run_preview(args: &PreviewArgs) -> Result<u8> {
    let (code, body) = render_preview(&args.source, &args.class, &args.native)?;
    println!("{body}");
    if code == ResponseCode::Success {
        Ok(0)
    } else {
        eprintln!("marshal returned {code}");
        Ok(1)
    }
}
