//! # restc-cli: Marshalling Compiler Command-Line Interface
//!
//! ## Subcommands
//!
//! - `generate`: compile every configured schema source to `<stem>.hh`
//! - `check`: report generated headers that are stale or missing
//! - `preview`: print the JSON body a class marshals from a native fixture
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here return an exit code.
//! - Handlers delegate to `restc-codegen` and `restc-eval`; no code
//!   generation logic lives in this crate.

pub mod check;
pub mod config;
pub mod generate;
pub mod preview;
