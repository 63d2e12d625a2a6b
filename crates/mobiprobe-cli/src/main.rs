//! Mobiprobe CLI: run mobile sanity suites
//!
//! ## Usage
//!
//! ```bash
//! mobiprobe run --platform android               # Run every sanity case
//! mobiprobe run -p bs_ios --marker login         # Only the login cases
//! mobiprobe data test_sanity_102 phone_number    # Inspect test data
//! mobiprobe caps --platform bs_android           # Resolved capabilities
//! ```

use clap::Parser;
use mobiprobe_cli::{handlers, Cli, CliConfig, CliResult, Commands, Verbosity};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.verbosity);

    let output = match &cli.command {
        Commands::Run(args) => handlers::run_suite(&config, args)?,
        Commands::Cases(args) => handlers::list_cases(args),
        Commands::Data(args) => handlers::show_data(&config, args)?,
        Commands::Caps(args) => handlers::show_caps(&config, args)?,
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn build_config(cli: &Cli) -> CliConfig {
    let color = !cli.no_color && std::io::IsTerminal::is_terminal(&std::io::stdout());
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_root(&cli.root)
        .with_color(color)
}

fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
