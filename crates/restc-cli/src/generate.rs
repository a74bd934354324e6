//! # Generate Subcommand
//!
//! Compiles each configured schema source in order. A failing source is
//! reported with its path and does not stop the remaining sources.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::config::{Settings, SourceArgs};

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub select: SourceArgs,
}

/// Execute the generate subcommand. Returns 1 when any source failed.
pub fn run_generate(args: &GenerateArgs, config: Option<&Path>) -> Result<u8> {
    let settings = Settings::resolve(config, &args.select)?;
    settings.ensure_out_dir()?;

    let mut failed = 0usize;
    for source in &settings.sources {
        match restc_codegen::compile_source(source, settings.out_dir.as_deref()) {
            Ok(output) => println!("  wrote: {}", output.display()),
            Err(e) => {
                failed += 1;
                tracing::error!(source = %source.display(), "{e}");
                eprintln!("  FAIL: {}: {e}", source.display());
            }
        }
    }

    let total = settings.sources.len();
    if failed == 0 {
        println!("OK: generated {total} header(s)");
        Ok(0)
    } else {
        eprintln!("FAILED: {failed} of {total} source(s) did not compile");
        Ok(1)
    }
}
