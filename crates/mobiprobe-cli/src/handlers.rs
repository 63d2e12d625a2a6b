//! Command handlers

use crate::commands::{CapsArgs, CasesArgs, DataArgs, ResultFormat, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{render_json, render_text};
use mobiprobe::{sanity_cases, CapabilityMap, DataReader, DriverFactory, SuiteRunner, WaitOptions};
use serde_json::Value;

/// Capability keys masked unless secrets are requested
const SECRET_CAPABILITIES: &[&str] = &["browserstack.key"];

/// Run the sanity suite and print the results.
///
/// Fails when the session cannot be created or any case fails.
pub fn run_suite(config: &CliConfig, args: &RunArgs) -> CliResult<String> {
    let mut factory = DriverFactory::new(args.platform, config.layout());
    if let Some(url) = &args.local_server {
        factory = factory.with_local_server(url);
    }
    if let Some(url) = &args.cloud_server {
        factory = factory.with_cloud_server(url);
    }

    let wait = WaitOptions::new()
        .with_timeout(args.timeout)
        .with_poll_interval(args.poll_interval);
    let runner = SuiteRunner::new(config.layout())
        .with_marker(args.marker)
        .with_wait_options(wait);

    tracing::info!(platform = %args.platform, endpoint = factory.endpoint(), "starting sanity run");
    let results = runner.run_with_factory(&factory, &sanity_cases())?;

    let rendered = match args.format {
        ResultFormat::Text => render_text(&results, config.color, config.verbosity.is_quiet()),
        ResultFormat::Json => render_json(&results)?,
    };
    if results.all_passed() {
        Ok(rendered)
    } else {
        print!("{rendered}");
        Err(CliError::test_execution(format!(
            "{} of {} tests failed",
            results.failed_count(),
            results.total()
        )))
    }
}

/// List the bundled cases with their markers
#[must_use]
pub fn list_cases(args: &CasesArgs) -> String {
    sanity_cases()
        .iter()
        .filter(|case| case.matches(args.marker))
        .map(|case| {
            let markers: Vec<&str> = case.markers.iter().map(|m| m.as_str()).collect();
            format!("{} [{}] {}\n", case.id, markers.join(", "), case.description)
        })
        .collect()
}

/// Test data of a case as pretty JSON
pub fn show_data(config: &CliConfig, args: &DataArgs) -> CliResult<String> {
    let reader = DataReader::new(&config.layout());
    if !reader.is_loaded() {
        return Err(CliError::config(format!(
            "could not load test data from {}",
            reader.test_data_path().display()
        )));
    }
    let value = match &args.key {
        Some(key) => reader.get_value(&args.case_id, key).ok_or_else(|| {
            CliError::invalid_argument(format!("no {key:?} for {}", args.case_id))
        })?,
        None => {
            let record = reader.record(&args.case_id).ok_or_else(|| {
                CliError::invalid_argument(format!("no test case {:?}", args.case_id))
            })?;
            serde_json::to_value(record)?
        }
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Resolved capabilities of a platform as pretty JSON
pub fn show_caps(config: &CliConfig, args: &CapsArgs) -> CliResult<String> {
    let mut caps = DriverFactory::new(args.platform, config.layout()).resolve_capabilities()?;
    if !args.show_secrets {
        mask_secrets(&mut caps);
    }
    Ok(serde_json::to_string_pretty(&caps)?)
}

fn mask_secrets(caps: &mut CapabilityMap) {
    for key in SECRET_CAPABILITIES {
        if let Some(value) = caps.get_mut(*key) {
            if value.is_string() {
                *value = Value::String("***".to_string());
            }
        }
    }
}
