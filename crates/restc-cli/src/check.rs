//! # Check Subcommand
//!
//! Renders every configured source and compares the result with the header
//! on disk, without writing anything.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use restc_codegen::Freshness;

use crate::config::{Settings, SourceArgs};

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    #[command(flatten)]
    pub select: SourceArgs,
}

/// Execute the check subcommand. Returns 1 when any header is stale,
/// missing, or its source fails to compile.
pub fn run_check(args: &CheckArgs, config: Option<&Path>) -> Result<u8> {
    let settings = Settings::resolve(config, &args.select)?;

    let mut problems = 0usize;
    for source in &settings.sources {
        match restc_codegen::check(source, settings.out_dir.as_deref()) {
            Ok((output, Freshness::Fresh)) => println!("  ok: {}", output.display()),
            Ok((output, freshness)) => {
                problems += 1;
                eprintln!("  {freshness}: {} (from {})", output.display(), source.display());
            }
            Err(e) => {
                problems += 1;
                tracing::error!(source = %source.display(), "{e}");
                eprintln!("  FAIL: {}: {e}", source.display());
            }
        }
    }

    if problems == 0 {
        println!("OK: all generated headers are up to date");
        Ok(0)
    } else {
        eprintln!("FAILED: {problems} header(s) need regeneration");
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{run_generate, GenerateArgs};

    #[test]
    fn detects_stale_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("only.ini");
        std::fs::write(
            &source,
            "[code]\nnamespace = only\n\n[c]\nname = Only\nrest_type = json_object*\n\
             ipc_key_struct = K\nipc_val_struct = V\nget_sections = f\nget_method = get_only\n\n\
             [f]\ntype = bool\nipc_name = flag\n",
        )
        .unwrap();
        let config = dir.path().join("restc.yaml");
        std::fs::write(&config, "sources: only.ini\n").unwrap();

        let check = CheckArgs::default();
        assert_eq!(run_check(&check, Some(&config)).unwrap(), 1);

        assert_eq!(run_generate(&GenerateArgs::default(), Some(&config)).unwrap(), 0);
        assert_eq!(run_check(&check, Some(&config)).unwrap(), 0);

        std::fs::write(dir.path().join("only.hh"), "stale\n").unwrap();
        assert_eq!(run_check(&check, Some(&config)).unwrap(), 1);
    }
}
