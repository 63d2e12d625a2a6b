//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use mobiprobe::{Marker, Platform};
use std::path::PathBuf;

/// Mobiprobe: run mobile app sanity suites against Appium or BrowserStack
#[derive(Parser, Debug)]
#[command(name = "mobiprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (log errors only; `run` prints failures and the summary)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root holding TestData/, DesiredCaps/ and MobileApp/
    #[arg(long, env = "MOBIPROBE_ROOT", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the sanity suite on a device
    Run(RunArgs),

    /// List the bundled test cases
    Cases(CasesArgs),

    /// Show test data for a case
    Data(DataArgs),

    /// Show the resolved capabilities for a platform
    Caps(CapsArgs),
}

/// Parse a platform tag, rejecting anything outside the supported set
pub fn parse_platform(value: &str) -> Result<Platform, String> {
    value.parse::<Platform>().map_err(|e| e.to_string())
}

/// Parse a test marker
pub fn parse_marker(value: &str) -> Result<Marker, String> {
    value.parse::<Marker>()
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Target platform: android, ios, bs_android or bs_ios
    #[arg(short, long, env = "MOBIPROBE_PLATFORM", value_parser = parse_platform)]
    pub platform: Platform,

    /// Only run cases with this marker (sanity, registration, login)
    #[arg(short, long, value_parser = parse_marker)]
    pub marker: Option<Marker>,

    /// Default element wait timeout in milliseconds
    #[arg(long, default_value = "10000")]
    pub timeout: u64,

    /// Poll interval for element waits in milliseconds
    #[arg(long, default_value = "500")]
    pub poll_interval: u64,

    /// Local Appium server URL
    #[arg(long)]
    pub local_server: Option<String>,

    /// Cloud hub URL
    #[arg(long)]
    pub cloud_server: Option<String>,

    /// Output format for the results
    #[arg(short, long, default_value = "text")]
    pub format: ResultFormat,
}

/// Result output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResultFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Arguments for the cases command
#[derive(Parser, Debug)]
pub struct CasesArgs {
    /// Only list cases with this marker
    #[arg(short, long, value_parser = parse_marker)]
    pub marker: Option<Marker>,
}

/// Arguments for the data command
#[derive(Parser, Debug)]
pub struct DataArgs {
    /// Test case id, e.g. test_sanity_102
    pub case_id: String,

    /// Key to show; the whole entry when omitted
    pub key: Option<String>,
}

/// Arguments for the caps command
#[derive(Parser, Debug)]
pub struct CapsArgs {
    /// Target platform: android, ios, bs_android or bs_ios
    #[arg(short, long, env = "MOBIPROBE_PLATFORM", value_parser = parse_platform)]
    pub platform: Platform,

    /// Print credentials unmasked
    #[arg(long)]
    pub show_secrets: bool,
}
