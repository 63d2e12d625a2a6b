//! Sanity suite and its runner.
//!
//! The runner owns the session lifecycle: the app is reset once before the
//! first case, after every case, and the session is quit when the run ends.
//! Each case gets a fresh [`TestFixture`] with its own pages, data reader
//! and random phone number.

use crate::actions::UiActions;
use crate::config::ProjectLayout;
use crate::driver_factory::DriverFactory;
use crate::execution_status::ExecutionStatus;
use crate::generators::{generate_random_phone_number, get_valid_user};
use crate::page_object::PlatformPage;
use crate::pages::{LoginPage, RegistrationPage};
use crate::result::{ProbeError, ProbeResult};
use crate::session::SessionContext;
use crate::test_data::DataReader;
use crate::wait::WaitOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Name of the bundled suite
pub const SANITY_SUITE: &str = "sanity";

/// Tag used to select a subset of cases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    /// Every sanity case
    Sanity,
    /// Registration flow
    Registration,
    /// Login flow
    Login,
}

impl Marker {
    /// All markers
    pub const ALL: [Self; 3] = [Self::Sanity, Self::Registration, Self::Login];

    /// Marker name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sanity => "sanity",
            Self::Registration => "registration",
            Self::Login => "login",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Marker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| format!("unknown marker {s:?}, expected sanity, registration or login"))
    }
}

/// Everything one test case works with
#[derive(Debug)]
pub struct TestFixture {
    /// Id of the running case
    pub case_id: String,
    /// Step collector
    pub exe_status: ExecutionStatus,
    /// Test data, freshly loaded for this case
    pub data_reader: DataReader,
    /// Registration flow
    pub reg_page: RegistrationPage,
    /// Login flow
    pub login_page: LoginPage,
    /// Phone number generated for this case
    pub phone_number: String,
}

impl TestFixture {
    /// Per-case setup over a live session
    #[must_use]
    pub fn new(case_id: &str, ctx: &SessionContext, layout: &ProjectLayout, wait: WaitOptions) -> Self {
        let actions = UiActions::new(ctx.clone(), &layout.screenshot_dir).with_wait_options(wait);
        Self {
            case_id: case_id.to_string(),
            exe_status: ExecutionStatus::new(actions.clone()),
            data_reader: DataReader::new(layout),
            reg_page: RegistrationPage::instance(actions.clone()),
            login_page: LoginPage::instance(actions),
            phone_number: generate_random_phone_number(),
        }
    }
}

/// Body of a test case
pub type CaseBody = fn(&mut TestFixture) -> ProbeResult<()>;

/// A named, marked test case
#[derive(Debug, Clone)]
pub struct SanityCase {
    /// Case id, also the key into the test data file
    pub id: &'static str,
    /// What the case verifies
    pub description: &'static str,
    /// Markers the case carries
    pub markers: Vec<Marker>,
    /// Test body
    pub body: CaseBody,
}

impl SanityCase {
    /// Whether the case is selected by `marker` (`None` selects all)
    #[must_use]
    pub fn matches(&self, marker: Option<Marker>) -> bool {
        marker.map_or(true, |m| self.markers.contains(&m))
    }
}

/// Navigation to the registration form and a successful registration.
///
/// # Errors
///
/// Fails with [`ProbeError::AssertionFailed`] at the first failed verdict.
pub fn test_sanity_101(fx: &mut TestFixture) -> ProbeResult<()> {
    let reached = fx.reg_page.navigate_to_registration_form_page(&fx.phone_number);
    fx.exe_status
        .mark_final("verify navigation to registration page", reached)?;

    let user = get_valid_user();
    let _ = fx.reg_page.enter_form_details(&user);
    let registered = fx.reg_page.verify_successful_registration();
    fx.exe_status
        .mark_final("verify successful user registration", registered)
}

/// Login with the registered phone number from the test data.
///
/// # Errors
///
/// Fails with [`ProbeError::TestData`] when no phone number is configured
/// for the case, or [`ProbeError::AssertionFailed`] when login fails.
pub fn test_sanity_102(fx: &mut TestFixture) -> ProbeResult<()> {
    let registered = fx
        .data_reader
        .get_string(&fx.case_id, "phone_number")
        .ok_or_else(|| ProbeError::TestData {
            message: format!("no phone_number for {}", fx.case_id),
        })?;

    let _ = fx.login_page.navigate_to_login_screen();
    let _ = fx.login_page.enter_phone_number(&registered);
    let logged_in = fx.login_page.verify_successful_login();
    fx.exe_status
        .mark_final("verify navigation to login page", logged_in)
}

/// The bundled sanity cases, in run order
#[must_use]
pub fn sanity_cases() -> Vec<SanityCase> {
    vec![
        SanityCase {
            id: "test_sanity_101",
            description: "navigation to registration page and successful user registration",
            markers: vec![Marker::Sanity, Marker::Registration],
            body: test_sanity_101,
        },
        SanityCase {
            id: "test_sanity_102",
            description: "navigation to login page and successful user login",
            markers: vec![Marker::Sanity, Marker::Login],
            body: test_sanity_102,
        },
    ]
}

/// Outcome of one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Case passed
    Passed,
    /// Case failed
    Failed,
    /// Case disabled by its run mode
    Skipped,
}

/// Result of running a single case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Case id
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Error message if failed
    pub error: Option<String>,
    /// Case duration
    pub duration: Duration,
}

impl TestResult {
    /// A passing result
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// A failing result
    #[must_use]
    pub fn fail(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            error: Some(error.into()),
            duration: Duration::ZERO,
        }
    }

    /// A skipped result
    #[must_use]
    pub fn skip(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            error: None,
            duration: Duration::ZERO,
        }
    }

    /// Set duration
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Results from running a suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResults {
    /// Suite name
    pub suite_name: String,
    /// Individual results, in run order
    pub results: Vec<TestResult>,
    /// Total duration
    pub duration: Duration,
}

impl SuiteResults {
    fn count(&self, status: TestStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Whether no case failed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    /// Count passed cases
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    /// Count failed cases
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    /// Count skipped cases
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    /// Total case count
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Failed cases
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResult> {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Failed)
            .collect()
    }
}

/// Whether a run mode value disables a case
#[must_use]
pub fn is_disabled_run_mode(run_mode: &str) -> bool {
    matches!(run_mode.trim().to_lowercase().as_str(), "n" | "no")
}

/// Runs cases sequentially over one session.
#[derive(Debug, Clone, Default)]
pub struct SuiteRunner {
    layout: ProjectLayout,
    wait: WaitOptions,
    marker: Option<Marker>,
}

impl SuiteRunner {
    /// Runner over a project layout
    #[must_use]
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Only run cases carrying `marker`
    #[must_use]
    pub const fn with_marker(mut self, marker: Option<Marker>) -> Self {
        self.marker = marker;
        self
    }

    /// Default wait options for page actions
    #[must_use]
    pub const fn with_wait_options(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Create a session through `factory` and run `cases` on it.
    ///
    /// # Errors
    ///
    /// Session creation failures abort the run.
    pub fn run_with_factory(&self, factory: &DriverFactory, cases: &[SanityCase]) -> ProbeResult<SuiteResults> {
        let ctx = factory.get_session()?;
        self.run(&ctx, cases)
    }

    /// Run `cases` on an existing session, then quit it.
    ///
    /// # Errors
    ///
    /// Returns the error of the initial app reset; case failures are
    /// reported in the results instead.
    pub fn run(&self, ctx: &SessionContext, cases: &[SanityCase]) -> ProbeResult<SuiteResults> {
        let start = Instant::now();
        tracing::info!(platform = %ctx.platform(), "session level setup");
        if let Err(e) = ctx.session().reset() {
            Self::quit(ctx);
            return Err(e);
        }

        let results = cases
            .iter()
            .filter(|case| case.matches(self.marker))
            .map(|case| self.run_case(ctx, case))
            .collect();

        tracing::info!("session level teardown");
        Self::quit(ctx);
        Ok(SuiteResults {
            suite_name: SANITY_SUITE.to_string(),
            results,
            duration: start.elapsed(),
        })
    }

    fn run_case(&self, ctx: &SessionContext, case: &SanityCase) -> TestResult {
        let start = Instant::now();
        let mut fixture = TestFixture::new(case.id, ctx, &self.layout, self.wait);

        if fixture.data_reader.has_case(case.id) {
            if let Some(mode) = fixture.data_reader.run_mode(case.id) {
                if is_disabled_run_mode(&mode) {
                    tracing::info!(case = case.id, run_mode = %mode, "skipping disabled test");
                    return TestResult::skip(case.id);
                }
            }
        }

        tracing::info!("###### TEST EXECUTION STARTED :: {} ######", case.id);
        let outcome = (case.body)(&mut fixture);
        if let Err(e) = ctx.session().reset() {
            tracing::error!(case = case.id, error = %e, "app reset after test failed");
        }

        let result = match outcome {
            Ok(()) => {
                tracing::info!(case = case.id, "PASSED");
                TestResult::pass(case.id)
            }
            Err(e) => {
                tracing::error!(case = case.id, error = %e, "FAILED");
                TestResult::fail(case.id, e.to_string())
            }
        };
        result.with_duration(start.elapsed())
    }

    fn quit(ctx: &SessionContext) {
        if let Err(e) = ctx.session().quit() {
            tracing::error!(error = %e, "session quit failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod marker_tests {
        use super::*;

        #[test]
        fn test_parse_markers() {
            assert_eq!("Login".parse::<Marker>().unwrap(), Marker::Login);
            assert_eq!(" sanity ".parse::<Marker>().unwrap(), Marker::Sanity);
            assert!("smoke".parse::<Marker>().is_err());
        }

        #[test]
        fn test_case_selection() {
            let cases = sanity_cases();
            assert!(cases.iter().all(|c| c.matches(None)));
            assert!(cases.iter().all(|c| c.matches(Some(Marker::Sanity))));
            let login: Vec<_> = cases.iter().filter(|c| c.matches(Some(Marker::Login))).collect();
            assert_eq!(login.len(), 1);
            assert_eq!(login[0].id, "test_sanity_102");
        }
    }

    mod result_tests {
        use super::*;

        #[test]
        fn test_counts() {
            let results = SuiteResults {
                suite_name: SANITY_SUITE.to_string(),
                results: vec![
                    TestResult::pass("a"),
                    TestResult::fail("b", "boom"),
                    TestResult::skip("c"),
                ],
                duration: Duration::ZERO,
            };
            assert_eq!(results.total(), 3);
            assert_eq!(results.passed_count(), 1);
            assert_eq!(results.failed_count(), 1);
            assert_eq!(results.skipped_count(), 1);
            assert!(!results.all_passed());
            assert_eq!(results.failures()[0].name, "b");
        }

        #[test]
        fn test_run_modes() {
            for disabled in ["N", "no", " NO ", "n"] {
                assert!(is_disabled_run_mode(disabled), "{disabled}");
            }
            for enabled in ["Y", "yes", ""] {
                assert!(!is_disabled_run_mode(enabled), "{enabled}");
            }
        }
    }
}
