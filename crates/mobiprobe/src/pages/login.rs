//! Login screen.

use super::{app_id, SLOW_SCREEN_TIMEOUT};
use crate::actions::UiActions;
use crate::locator::Locator;
use crate::page_object::{PageObject, PlatformPage};
use crate::platform::PlatformVariant;

/// Views the login flow touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginLocators {
    /// Sign-up / get-started button on the landing screen
    pub signup_button: Locator,
    /// Phone number field
    pub phone_number_input: Locator,
    /// Button submitting the phone number
    pub continue_button: Locator,
    /// Permission prompt shown after a successful login
    pub permission_grant_button: Locator,
}

impl LoginLocators {
    fn base() -> Self {
        Self {
            signup_button: app_id("sign_up_button"),
            phone_number_input: app_id("phone_number_input"),
            continue_button: app_id("verify_number_button"),
            permission_grant_button: app_id("grant_permissions_button")
                .with_timeout(SLOW_SCREEN_TIMEOUT),
        }
    }

    /// Android locators
    #[must_use]
    pub fn android() -> Self {
        Self::base()
    }

    /// iOS locators
    #[must_use]
    pub fn ios() -> Self {
        Self::base()
    }
}

/// Login screen of the app under test
#[derive(Debug, Clone)]
pub struct LoginPage {
    actions: UiActions,
    variant: PlatformVariant,
    locators: LoginLocators,
}

impl LoginPage {
    /// Replace the locators
    #[must_use]
    pub fn with_locators(mut self, locators: LoginLocators) -> Self {
        self.locators = locators;
        self
    }

    /// Locators in use
    #[must_use]
    pub const fn locators(&self) -> &LoginLocators {
        &self.locators
    }

    /// Tap sign-up and report whether the phone number field appeared.
    pub fn navigate_to_login_screen(&self) -> bool {
        let _ = self.actions.click(&self.locators.signup_button);
        self.actions
            .is_element_displayed(&self.locators.phone_number_input)
    }

    /// Type the phone number and submit it.
    pub fn enter_phone_number(&self, phone_number: &str) -> bool {
        let typed = self
            .actions
            .enter_text(&self.locators.phone_number_input, phone_number);
        typed && self.actions.click(&self.locators.continue_button)
    }

    /// Whether the post-login permission prompt is displayed
    #[must_use]
    pub fn verify_successful_login(&self) -> bool {
        self.actions
            .is_element_displayed(&self.locators.permission_grant_button)
    }
}

impl PageObject for LoginPage {
    fn variant(&self) -> PlatformVariant {
        self.variant
    }

    fn actions(&self) -> &UiActions {
        &self.actions
    }

    fn page_name(&self) -> &str {
        "login"
    }
}

impl PlatformPage for LoginPage {
    fn android(actions: UiActions) -> Self {
        Self {
            actions,
            variant: PlatformVariant::Android,
            locators: LoginLocators::android(),
        }
    }

    fn ios(actions: UiActions) -> Self {
        Self {
            actions,
            variant: PlatformVariant::Ios,
            locators: LoginLocators::ios(),
        }
    }
}
