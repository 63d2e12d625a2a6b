//! Registration screens: phone verification, card selection and the
//! personal details form.

use super::{app_id, SLOW_SCREEN_TIMEOUT};
use crate::actions::UiActions;
use crate::generators::User;
use crate::locator::Locator;
use crate::page_object::{PageObject, PlatformPage};
use crate::platform::PlatformVariant;
use std::time::Duration;

/// How long the optional "next" button gets to show up on the form
pub const NEXT_BUTTON_TIMEOUT: Duration = Duration::from_secs(3);

/// Views the registration flow touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationLocators {
    /// Sign-up button on the landing screen
    pub signup_button: Locator,
    /// Phone number field
    pub phone_number_input: Locator,
    /// Button submitting the phone number
    pub continue_button: Locator,
    /// Card shown on the main registration screen
    pub card_link: Locator,
    /// First name field
    pub first_name_input: Locator,
    /// Last name field
    pub last_name_input: Locator,
    /// Date of birth field
    pub dob_input: Locator,
    /// Floating "next" button, only shown on some form layouts
    pub next_button: Locator,
    /// Form submit button
    pub submit_button: Locator,
    /// Permission prompt shown after a successful registration
    pub permission_grant_button: Locator,
}

impl RegistrationLocators {
    fn base() -> Self {
        Self {
            signup_button: app_id("sign_up_button"),
            phone_number_input: app_id("phone_number_input"),
            continue_button: app_id("verify_number_button"),
            card_link: app_id("card_front").with_timeout(SLOW_SCREEN_TIMEOUT),
            first_name_input: app_id("first_name"),
            last_name_input: app_id("last_name"),
            dob_input: app_id("dob"),
            next_button: app_id("next_button_fab").with_timeout(NEXT_BUTTON_TIMEOUT),
            submit_button: app_id("continue_button"),
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

/// Registration flow of the app under test
#[derive(Debug, Clone)]
pub struct RegistrationPage {
    actions: UiActions,
    variant: PlatformVariant,
    locators: RegistrationLocators,
}

impl RegistrationPage {
    /// Replace the locators
    #[must_use]
    pub fn with_locators(mut self, locators: RegistrationLocators) -> Self {
        self.locators = locators;
        self
    }

    /// Locators in use
    #[must_use]
    pub const fn locators(&self) -> &RegistrationLocators {
        &self.locators
    }

    /// Walk from the landing screen to the registration form.
    ///
    /// Taps sign-up, submits `phone_number`, then opens the card on the
    /// main registration screen. Returns `false` as soon as an expected
    /// screen does not show up.
    pub fn navigate_to_registration_form_page(&self, phone_number: &str) -> bool {
        let l = &self.locators;
        let _ = self.actions.click(&l.signup_button);
        if !self.actions.is_element_displayed(&l.phone_number_input) {
            tracing::error!("Phone number screen is not visible.");
            return false;
        }
        let _ = self.actions.enter_text(&l.phone_number_input, phone_number);
        let _ = self.actions.click(&l.continue_button);
        if !self.actions.is_element_displayed(&l.card_link) {
            tracing::error!("Main registration screen is not visible.");
            return false;
        }
        let _ = self.actions.click(&l.card_link);
        true
    }

    /// Fill in the personal details form and submit it.
    ///
    /// The "next" button is tapped only when it shows up. Returns whether
    /// every field was filled and the form submitted.
    pub fn enter_form_details(&self, user: &User) -> bool {
        let l = &self.locators;
        let filled = [
            (&l.first_name_input, user.first_name.as_str()),
            (&l.last_name_input, user.last_name.as_str()),
            (&l.dob_input, user.dob.as_str()),
        ]
        .into_iter()
        .fold(true, |ok, (locator, value)| {
            self.actions.enter_text(locator, value) && ok
        });
        if self.actions.is_element_displayed(&l.next_button) {
            let _ = self.actions.click(&l.next_button);
        }
        let submitted = self.actions.click(&l.submit_button);
        if !(filled && submitted) {
            tracing::error!(filled, submitted, "Failed to fill the form details");
        }
        filled && submitted
    }

    /// Whether the post-registration permission prompt is displayed
    #[must_use]
    pub fn verify_successful_registration(&self) -> bool {
        self.actions
            .is_element_displayed(&self.locators.permission_grant_button)
    }
}

impl PageObject for RegistrationPage {
    fn variant(&self) -> PlatformVariant {
        self.variant
    }

    fn actions(&self) -> &UiActions {
        &self.actions
    }

    fn page_name(&self) -> &str {
        "registration"
    }
}

impl PlatformPage for RegistrationPage {
    fn android(actions: UiActions) -> Self {
        Self {
            actions,
            variant: PlatformVariant::Android,
            locators: RegistrationLocators::android(),
        }
    }

    fn ios(actions: UiActions) -> Self {
        Self {
            actions,
            variant: PlatformVariant::Ios,
            locators: RegistrationLocators::ios(),
        }
    }
}
