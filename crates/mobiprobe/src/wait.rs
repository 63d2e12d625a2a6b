//! Wait Mechanisms
//!
//! Polling waits for element state on a remote session.
//!
//! A wait never raises: it reports a [`WaitOutcome`]. Lookup misses and stale
//! references are retried until the timeout; any other session error ends
//! the wait early as [`WaitOutcome::Aborted`].

use crate::locator::Locator;
use crate::result::ProbeError;
use crate::session::{ElementHandle, MobileSession};
use std::fmt;
use std::time::{Duration, Instant};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for element waits (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (500ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Apply a locator's own timeout override, if it has one
    #[must_use]
    pub fn for_locator(self, locator: &Locator) -> Self {
        match locator.timeout() {
            Some(t) => self.with_timeout(t.as_millis() as u64),
            None => self,
        }
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// =============================================================================
// ELEMENT CONDITIONS
// =============================================================================

/// Element state a wait can block on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementCondition {
    /// Element exists in the view hierarchy
    Present,
    /// Element exists and is displayed
    Visible,
    /// Element is displayed and enabled
    Clickable,
    /// Element is absent or not displayed
    Invisible,
    /// Element exists and is selected / checked
    Selected,
}

impl ElementCondition {
    /// Word used in log lines for a missed condition
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Visible => "visible",
            Self::Clickable => "clickable",
            Self::Invisible => "invisible",
            Self::Selected => "selected",
        }
    }

    /// Evaluate the condition once.
    ///
    /// `Ok(Some(_))` means satisfied, `Ok(None)` means not yet. For
    /// `Invisible` the satisfied value carries no element.
    fn probe(
        self,
        session: &dyn MobileSession,
        locator: &Locator,
    ) -> Result<Option<Option<ElementHandle>>, ProbeError> {
        match self {
            Self::Invisible => Self::probe_invisible(session, locator),
            Self::Present => session.find_element(locator).map(|el| Some(Some(el))),
            Self::Visible => {
                let el = session.find_element(locator)?;
                Ok(session.is_displayed(&el)?.then_some(Some(el)))
            }
            Self::Clickable => {
                let el = session.find_element(locator)?;
                let ready = session.is_displayed(&el)? && session.is_enabled(&el)?;
                Ok(ready.then_some(Some(el)))
            }
            Self::Selected => {
                let el = session.find_element(locator)?;
                Ok(session.is_selected(&el)?.then_some(Some(el)))
            }
        }
    }

    // Absent and stale both count as invisible.
    fn probe_invisible(
        session: &dyn MobileSession,
        locator: &Locator,
    ) -> Result<Option<Option<ElementHandle>>, ProbeError> {
        let shown = session
            .find_element(locator)
            .and_then(|el| session.is_displayed(&el));
        match shown {
            Ok(true) => Ok(None),
            Ok(false) => Ok(Some(None)),
            Err(e) if e.is_transient_lookup() => Ok(Some(None)),
            Err(e) => Err(e),
        }
    }
}

impl fmt::Display for ElementCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

// =============================================================================
// WAIT OUTCOME
// =============================================================================

/// Result of a wait operation
#[derive(Debug, Clone)]
pub enum WaitOutcome {
    /// The condition held
    Satisfied {
        /// The matched element, when the condition has one
        element: Option<ElementHandle>,
        /// Time spent waiting
        elapsed: Duration,
    },
    /// The timeout elapsed first
    TimedOut {
        /// Time spent waiting
        elapsed: Duration,
        /// Description of what was waited for
        waited_for: String,
    },
    /// A non-retryable session error ended the wait
    Aborted {
        /// Time spent waiting
        elapsed: Duration,
        /// The error message
        message: String,
    },
}

impl WaitOutcome {
    /// Whether the condition held
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }

    /// Whether the wait ran out of time
    #[must_use]
    pub const fn timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    /// Time spent waiting
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        match self {
            Self::Satisfied { elapsed, .. }
            | Self::TimedOut { elapsed, .. }
            | Self::Aborted { elapsed, .. } => *elapsed,
        }
    }

    /// The matched element, consuming the outcome
    #[must_use]
    pub fn into_element(self) -> Option<ElementHandle> {
        match self {
            Self::Satisfied { element, .. } => element,
            _ => None,
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Polls a session until an element condition holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    options: WaitOptions,
}

impl Waiter {
    /// Create a new waiter with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom options
    #[must_use]
    pub const fn with_options(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Default options of this waiter
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait for `condition` on the element found by `locator`.
    ///
    /// The locator's own timeout, when set, overrides the waiter default.
    pub fn until(
        &self,
        session: &dyn MobileSession,
        locator: &Locator,
        condition: ElementCondition,
    ) -> WaitOutcome {
        let options = self.options.for_locator(locator);
        let start = Instant::now();

        loop {
            match condition.probe(session, locator) {
                Ok(Some(element)) => {
                    return WaitOutcome::Satisfied {
                        element,
                        elapsed: start.elapsed(),
                    };
                }
                Ok(None) => {}
                Err(e) if e.is_transient_lookup() => {}
                Err(e) => {
                    tracing::error!(
                        selector = locator.selector(),
                        strategy = %locator.strategy(),
                        error = %e,
                        "wait for {condition} element aborted"
                    );
                    return WaitOutcome::Aborted {
                        elapsed: start.elapsed(),
                        message: e.to_string(),
                    };
                }
            }

            let elapsed = start.elapsed();
            if elapsed >= options.timeout() {
                tracing::error!(
                    selector = locator.selector(),
                    strategy = %locator.strategy(),
                    timeout_ms = options.timeout_ms,
                    "Element is not {condition} with {locator}"
                );
                return WaitOutcome::TimedOut {
                    elapsed,
                    waited_for: format!("{condition} {locator}"),
                };
            }
            std::thread::sleep(options.poll_interval().min(options.timeout() - elapsed));
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MockElement, MockSession};

    fn fast() -> Waiter {
        Waiter::with_options(WaitOptions::new().with_timeout(200).with_poll_interval(10))
    }

    mod wait_options_tests {
        use super::*;

        #[test]
        fn test_wait_options_default() {
            let opts = WaitOptions::default();
            assert_eq!(opts.timeout_ms, 10_000);
            assert_eq!(opts.poll_interval_ms, 500);
        }

        #[test]
        fn test_wait_options_chained() {
            let opts = WaitOptions::new().with_timeout(3_000).with_poll_interval(100);
            assert_eq!(opts.timeout(), Duration::from_secs(3));
            assert_eq!(opts.poll_interval(), Duration::from_millis(100));
        }

        #[test]
        fn test_locator_override() {
            let locator = Locator::id("x").with_timeout(Duration::from_secs(20));
            let opts = WaitOptions::new().for_locator(&locator);
            assert_eq!(opts.timeout_ms, 20_000);
            let plain = WaitOptions::new().for_locator(&Locator::id("x"));
            assert_eq!(plain.timeout_ms, DEFAULT_WAIT_TIMEOUT_MS);
        }
    }

    mod condition_tests {
        use super::*;

        #[test]
        fn test_present_returns_element() {
            let session = MockSession::new();
            session.add_element(MockElement::new(Locator::id("a")).displayed(false));
            let outcome = fast().until(&session, &Locator::id("a"), ElementCondition::Present);
            assert!(outcome.succeeded());
            assert!(outcome.into_element().is_some());
        }

        #[test]
        fn test_visible_requires_displayed() {
            let session = MockSession::new();
            session.add_element(MockElement::new(Locator::id("a")).displayed(false));
            let outcome = fast().until(&session, &Locator::id("a"), ElementCondition::Visible);
            assert!(outcome.timed_out());
        }

        #[test]
        fn test_clickable_requires_enabled() {
            let session = MockSession::new();
            session.add_element(MockElement::new(Locator::id("a")).enabled(false));
            let outcome = fast().until(&session, &Locator::id("a"), ElementCondition::Clickable);
            assert!(outcome.timed_out());

            session.add_element(MockElement::new(Locator::id("b")));
            let outcome = fast().until(&session, &Locator::id("b"), ElementCondition::Clickable);
            assert!(outcome.succeeded());
        }

        #[test]
        fn test_invisible_when_absent() {
            let session = MockSession::new();
            let outcome = fast().until(&session, &Locator::id("gone"), ElementCondition::Invisible);
            assert!(outcome.succeeded());
            assert!(outcome.into_element().is_none());
        }

        #[test]
        fn test_invisible_when_hidden() {
            let session = MockSession::new();
            session.add_element(MockElement::new(Locator::id("spinner")).displayed(false));
            let outcome =
                fast().until(&session, &Locator::id("spinner"), ElementCondition::Invisible);
            assert!(outcome.succeeded());
        }

        #[test]
        fn test_invisible_times_out_while_shown() {
            let session = MockSession::new();
            session.add_element(MockElement::new(Locator::id("spinner")));
            let outcome =
                fast().until(&session, &Locator::id("spinner"), ElementCondition::Invisible);
            assert!(outcome.timed_out());
        }

        #[test]
        fn test_selected() {
            let session = MockSession::new();
            session.add_element(MockElement::new(Locator::id("tos")).selected(true));
            let outcome = fast().until(&session, &Locator::id("tos"), ElementCondition::Selected);
            assert!(outcome.succeeded());
        }
    }

    mod timing_tests {
        use super::*;

        #[test]
        fn test_never_true_waits_full_timeout() {
            let session = MockSession::new();
            let waiter =
                Waiter::with_options(WaitOptions::new().with_timeout(150).with_poll_interval(20));
            let start = Instant::now();
            let outcome = waiter.until(&session, &Locator::id("never"), ElementCondition::Present);
            assert!(outcome.timed_out());
            assert!(start.elapsed() >= Duration::from_millis(150));
            assert!(session.find_calls() > 1);
        }

        #[test]
        fn test_returns_once_condition_holds() {
            let session = MockSession::new();
            session.add_element(
                MockElement::new(Locator::id("late")).appears_after(Duration::from_millis(50)),
            );
            let waiter =
                Waiter::with_options(WaitOptions::new().with_timeout(2_000).with_poll_interval(10));
            let outcome = waiter.until(&session, &Locator::id("late"), ElementCondition::Visible);
            assert!(outcome.succeeded());
            assert!(outcome.elapsed() >= Duration::from_millis(50));
            assert!(outcome.elapsed() < Duration::from_millis(1_000));
        }

        #[test]
        fn test_locator_timeout_wins() {
            let session = MockSession::new();
            let waiter = Waiter::new();
            let locator = Locator::id("never").with_timeout(Duration::from_millis(60));
            let start = Instant::now();
            let outcome = waiter.until(&session, &locator, ElementCondition::Present);
            assert!(outcome.timed_out());
            assert!(start.elapsed() < Duration::from_secs(2));
        }

        #[test]
        fn test_hard_error_aborts_early() {
            let session = MockSession::new();
            session.fail_with("connection refused");
            let waiter =
                Waiter::with_options(WaitOptions::new().with_timeout(5_000).with_poll_interval(10));
            let outcome = waiter.until(&session, &Locator::id("x"), ElementCondition::Present);
            match outcome {
                WaitOutcome::Aborted { message, elapsed } => {
                    assert!(message.contains("connection refused"));
                    assert!(elapsed < Duration::from_secs(1));
                }
                other => panic!("expected Aborted, got {other:?}"),
            }
        }

        #[test]
        fn test_timed_out_description() {
            let session = MockSession::new();
            let outcome = fast().until(&session, &Locator::xpath("//a"), ElementCondition::Visible);
            match outcome {
                WaitOutcome::TimedOut { waited_for, .. } => {
                    assert!(waited_for.contains("visible"));
                    assert!(waited_for.contains("//a"));
                }
                other => panic!("expected TimedOut, got {other:?}"),
            }
        }
    }
}
