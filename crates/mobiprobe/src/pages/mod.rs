//! Page objects for the app under test.

mod login;
mod registration;

pub use login::{LoginLocators, LoginPage};
pub use registration::{RegistrationLocators, RegistrationPage};

use crate::locator::Locator;
use std::time::Duration;

/// Resource-id prefix of the debug build
pub const APP_ID_PREFIX: &str = "com.fampay.in.debug:id/";

/// How long the post-verification screens get to appear
pub const SLOW_SCREEN_TIMEOUT: Duration = Duration::from_secs(20);

/// Resource-id locator for a view of the app under test
#[must_use]
pub fn app_id(name: &str) -> Locator {
    Locator::id(format!("{APP_ID_PREFIX}{name}"))
}
