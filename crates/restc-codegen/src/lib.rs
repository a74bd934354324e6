//! # restc-codegen: Marshalling Code Generation
//!
//! Turns a validated [`Schema`](restc_schema::Schema) into one C++ header
//! per schema source.
//!
//! ## Pipeline
//!
//! ```text
//! SchemaSource ─▶ Schema (validated graph) ─▶ GeneratedUnit (in memory) ─▶ <stem>.hh
//! ```
//!
//! Every schema problem surfaces before the first output line is produced,
//! and the unit is written with a single atomic rename, so a failed source
//! never leaves a partial header behind.
//!
//! ## Modules
//!
//! - [`contract`]: runtime symbols referenced by generated code.
//! - [`emit`]: per-kind accessor emitters and aggregate methods.
//! - [`unit`]: header assembly.
//! - [`writer`]: output naming and atomic writes.

pub mod contract;
pub mod emit;
pub mod error;
pub mod unit;
pub mod writer;

use std::path::{Path, PathBuf};

use restc_schema::Schema;

pub use error::CodegenError;
pub use unit::{header_guard, GeneratedUnit};
pub use writer::{output_path, write_atomic};

/// Load, validate and assemble the unit for one schema source.
pub fn render(source: &Path) -> Result<GeneratedUnit, CodegenError> {
    let schema = Schema::load(source)?;
    GeneratedUnit::assemble(&schema)
}

/// Compile one schema source and write `<stem>.hh`.
///
/// Returns the output path. On error nothing is written.
pub fn compile_source(source: &Path, out_dir: Option<&Path>) -> Result<PathBuf, CodegenError> {
    let unit = render(source)?;
    let output = output_path(source, out_dir)?;
    write_atomic(&output, &unit.render())?;
    tracing::info!(
        source = %source.display(),
        output = %output.display(),
        lines = unit.lines().len(),
        "wrote unit"
    );
    Ok(output)
}

/// State of a generated header relative to its schema source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The file on disk matches the rendered unit byte for byte.
    Fresh,
    /// The file exists but differs.
    Stale,
    /// No file exists.
    Missing,
}

impl std::fmt::Display for Freshness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fresh => f.write_str("up to date"),
            Self::Stale => f.write_str("stale"),
            Self::Missing => f.write_str("missing"),
        }
    }
}

/// Render one schema source and compare it with the header on disk.
pub fn check(source: &Path, out_dir: Option<&Path>) -> Result<(PathBuf, Freshness), CodegenError> {
    let unit = render(source)?;
    let output = output_path(source, out_dir)?;
    let freshness = match std::fs::read(&output) {
        Ok(existing) if existing == unit.render().as_bytes() => Freshness::Fresh,
        Ok(_) => Freshness::Stale,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Freshness::Missing,
        Err(e) => {
            return Err(CodegenError::Io {
                path: output,
                source: e,
            })
        }
    };
    tracing::debug!(output = %output.display(), %freshness, "checked unit");
    Ok((output, freshness))
}
