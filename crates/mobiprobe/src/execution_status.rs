//! Step result collection for test cases.
//!
//! Page flows report plain booleans. A test records each one with
//! [`ExecutionStatus::mark`] and closes a group of steps with
//! [`ExecutionStatus::mark_final`], which fails if any step since the last
//! verdict failed. Failing steps get a screenshot when the collector has a
//! session to take one from.

use crate::actions::UiActions;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// Step passed
    Pass,
    /// Step failed
    Fail,
}

impl From<bool> for StepStatus {
    fn from(result: bool) -> Self {
        if result {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::Fail => f.write_str("FAIL"),
        }
    }
}

/// A recorded step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step description
    pub step: String,
    /// Outcome
    pub status: StepStatus,
    /// Screenshot taken when the step failed
    pub screenshot: Option<PathBuf>,
}

/// Collects step outcomes for one test.
#[derive(Debug, Default)]
pub struct ExecutionStatus {
    actions: Option<UiActions>,
    pending: Vec<StepRecord>,
    history: Vec<StepRecord>,
}

impl ExecutionStatus {
    /// Collector that screenshots failing steps through `actions`
    #[must_use]
    pub fn new(actions: UiActions) -> Self {
        Self {
            actions: Some(actions),
            ..Self::default()
        }
    }

    /// Collector without screenshots
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Record a step outcome.
    pub fn mark(&mut self, step: &str, result: bool) {
        let status = StepStatus::from(result);
        let screenshot = match (status, &self.actions) {
            (StepStatus::Fail, Some(actions)) => Some(actions.take_screenshot(&screenshot_initials(step))),
            _ => None,
        };
        match status {
            StepStatus::Pass => tracing::info!(step, "### STEP SUCCESSFUL"),
            StepStatus::Fail => tracing::error!(step, "### STEP FAILED"),
        }
        self.pending.push(StepRecord {
            step: step.to_string(),
            status,
            screenshot,
        });
    }

    /// Record the closing step of a group and return the group verdict.
    ///
    /// Pending steps are cleared either way.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::AssertionFailed`] naming every failed step
    /// when any step of the group failed.
    pub fn mark_final(&mut self, step: &str, result: bool) -> ProbeResult<()> {
        self.mark(step, result);
        let group: Vec<StepRecord> = self.pending.drain(..).collect();
        let failed: Vec<&str> = group
            .iter()
            .filter(|r| r.status == StepStatus::Fail)
            .map(|r| r.step.as_str())
            .collect();
        let verdict = if failed.is_empty() {
            tracing::info!(step, "### TEST SUCCESSFUL");
            Ok(())
        } else {
            tracing::error!(step, failed = ?failed, "### TEST FAILED");
            Err(ProbeError::AssertionFailed {
                message: format!("failed steps: {}", failed.join(", ")),
            })
        };
        self.history.extend(group);
        verdict
    }

    /// Steps recorded since the last verdict
    #[must_use]
    pub fn pending(&self) -> &[StepRecord] {
        &self.pending
    }

    /// Every step already closed by a verdict
    #[must_use]
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }
}

fn screenshot_initials(step: &str) -> String {
    step.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
