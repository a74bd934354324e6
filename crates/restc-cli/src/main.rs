//! # restc CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use restc_cli::check::{run_check, CheckArgs};
use restc_cli::generate::{run_generate, GenerateArgs};
use restc_cli::preview::{run_preview, PreviewArgs};

/// restc: REST marshalling-code compiler.
///
/// Compiles INI schema sources into C++ headers that convert between JSON
/// request/response bodies and native key/val structures.
#[derive(Parser, Debug)]
#[command(name = "restc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: ./restc.yaml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile schema sources into C++ headers.
    Generate(GenerateArgs),

    /// Verify generated headers are up to date without writing them.
    Check(CheckArgs),

    /// Print the JSON body a class marshals from a native fixture.
    Preview(PreviewArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("restc v{} starting", env!("CARGO_PKG_VERSION"));

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Generate(args) => run_generate(args, config),
        Commands::Check(args) => run_check(args, config),
        Commands::Preview(args) => run_preview(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
