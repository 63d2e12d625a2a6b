//! Result rendering

use console::{style, Style};
use mobiprobe::{SuiteResults, TestStatus};
use std::fmt::Write as _;

/// Text summary of a suite run.
///
/// Quiet output keeps only failed cases and the summary line.
#[must_use]
pub fn render_text(results: &SuiteResults, color: bool, quiet: bool) -> String {
    let paint = |s: &str, st: Style| -> String {
        if color {
            st.apply_to(s).to_string()
        } else {
            s.to_string()
        }
    };

    let mut out = String::new();
    for r in &results.results {
        if quiet && r.status != TestStatus::Failed {
            continue;
        }
        let label = match r.status {
            TestStatus::Passed => paint("PASS", Style::new().green().bold()),
            TestStatus::Failed => paint("FAIL", Style::new().red().bold()),
            TestStatus::Skipped => paint("SKIP", Style::new().yellow()),
        };
        let _ = write!(out, "{label} {} ({:.2}s)", r.name, r.duration.as_secs_f64());
        if let Some(error) = &r.error {
            let _ = write!(out, ": {error}");
        }
        out.push('\n');
    }

    let summary = format!(
        "{}: {} passed, {} failed, {} skipped in {:.2}s",
        results.suite_name,
        results.passed_count(),
        results.failed_count(),
        results.skipped_count(),
        results.duration.as_secs_f64()
    );
    if color {
        let styled = if results.all_passed() {
            style(summary).green()
        } else {
            style(summary).red()
        };
        let _ = writeln!(out, "{styled}");
    } else {
        let _ = writeln!(out, "{summary}");
    }
    out
}

/// JSON document of a suite run
pub fn render_json(results: &SuiteResults) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}
