//! Mobiprobe: page-object UI test automation for mobile apps
//!
//! Drives an app under test over the W3C WebDriver / Appium wire protocol
//! and layers page objects, polling waits and JSON test data on top.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Sanity suite │──►│ Page objects │──►│  UiActions   │──►│ MobileSession│
//! │ (SuiteRunner)│   │ (per variant)│   │ (wait + act) │   │ (W3C / mock) │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//!        │                                                         ▲
//!        ▼                                                         │
//! ┌──────────────┐   ┌──────────────┐                              │
//! │  DataReader  │◄──│DriverFactory │──────────────────────────────┘
//! └──────────────┘   └──────────────┘
//! ```

#![warn(missing_docs)]

mod actions;
mod config;
mod driver_factory;
mod execution_status;
mod generators;
mod locator;
mod page_object;
/// Page objects for the app under test
pub mod pages;
mod platform;
mod result;
mod session;
mod suite;
mod test_data;
mod wait;
/// Blocking W3C WebDriver client
pub mod webdriver;

pub use actions::{scroll_expression, UiActions, INNER_TEXT_ATTRIBUTE};
pub use config::{
    ProjectLayout, DEFAULT_APP_DIR, DEFAULT_CAPS_DIR, DEFAULT_SCREENSHOT_DIR, DEFAULT_TEST_DATA,
};
pub use driver_factory::{
    CloudCredentials, DriverFactory, BROWSERSTACK_SERVER, BS_KEY_ENV, BS_USERNAME_ENV,
    LOCAL_APPIUM_SERVER,
};
pub use execution_status::{ExecutionStatus, StepRecord, StepStatus};
pub use generators::{generate_random_phone_number, get_valid_user, User};
pub use locator::{Locator, LocatorStrategy};
pub use page_object::{PageObject, PlatformPage};
pub use platform::{Platform, PlatformVariant};
pub use result::{ProbeError, ProbeResult};
pub use session::{
    ElementHandle, MobileSession, MockElement, MockSession, ScrollDirection, SessionContext,
};
pub use suite::{
    is_disabled_run_mode, sanity_cases, test_sanity_101, test_sanity_102, CaseBody, Marker,
    SanityCase, SuiteResults, SuiteRunner, TestFixture, TestResult, TestStatus, SANITY_SUITE,
};
pub use test_data::{load_json, CapabilityMap, DataReader, TestCaseRecord, RUN_MODE_KEY};
pub use wait::{
    ElementCondition, WaitOptions, WaitOutcome, Waiter, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};
pub use webdriver::RemoteSession;

/// Everything a test script usually needs
pub mod prelude {
    pub use super::actions::*;
    pub use super::config::*;
    pub use super::driver_factory::*;
    pub use super::execution_status::*;
    pub use super::generators::*;
    pub use super::locator::*;
    pub use super::page_object::*;
    pub use super::pages::*;
    pub use super::platform::*;
    pub use super::result::*;
    pub use super::session::*;
    pub use super::suite::*;
    pub use super::test_data::*;
    pub use super::wait::*;
}
