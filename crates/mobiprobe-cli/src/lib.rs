//! Mobiprobe CLI library
//!
//! Argument parsing, configuration and command handlers for the
//! `mobiprobe` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{
    parse_marker, parse_platform, CapsArgs, CasesArgs, Cli, Commands, DataArgs, ResultFormat,
    RunArgs,
};
pub use config::{CliConfig, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{render_json, render_text};
