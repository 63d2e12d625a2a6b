//! Element actions built on the polling wait.
//!
//! Every action waits for the element state it needs before touching the
//! element. A failed wait or a session error is logged and surfaces as
//! `false` (for actions and checks) or `None` (for reads); actions never
//! return errors to page objects.

use crate::locator::Locator;
use crate::session::{ElementHandle, MobileSession, ScrollDirection, SessionContext};
use crate::wait::{ElementCondition, WaitOptions, WaitOutcome, Waiter};
use std::path::{Path, PathBuf};

/// Attribute read when an element reports empty text
pub const INNER_TEXT_ATTRIBUTE: &str = "innerText";

/// UiScrollable expression that scrolls `scroll_view` until an element of
/// class `class_name` with the given text is in view.
#[must_use]
pub fn scroll_expression(
    direction: ScrollDirection,
    scroll_view: &str,
    class_name: &str,
    text: &str,
) -> String {
    let list = match direction {
        ScrollDirection::Vertical => "",
        ScrollDirection::Horizontal => ".setAsHorizontalList()",
    };
    format!(
        "new UiScrollable(new UiSelector().scrollable(true).className(\"{scroll_view}\")){list}\
         .scrollIntoView(new UiSelector().className(\"{class_name}\").text(\"{text}\"))"
    )
}

/// Element actions over a shared session.
#[derive(Debug, Clone)]
pub struct UiActions {
    ctx: SessionContext,
    waiter: Waiter,
    screenshot_dir: PathBuf,
}

impl UiActions {
    /// Actions with default wait options, saving screenshots under
    /// `screenshot_dir`
    pub fn new(ctx: SessionContext, screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            ctx,
            waiter: Waiter::new(),
            screenshot_dir: screenshot_dir.into(),
        }
    }

    /// Replace the default wait options
    #[must_use]
    pub const fn with_wait_options(mut self, options: WaitOptions) -> Self {
        self.waiter = Waiter::with_options(options);
        self
    }

    /// Session context the actions run against
    #[must_use]
    pub const fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Directory screenshots are written to
    #[must_use]
    pub fn screenshot_dir(&self) -> &Path {
        &self.screenshot_dir
    }

    fn session(&self) -> &dyn MobileSession {
        self.ctx.session().as_ref()
    }

    /// Wait for a condition and return the full outcome
    #[must_use]
    pub fn wait(&self, locator: &Locator, condition: ElementCondition) -> WaitOutcome {
        self.waiter.until(self.session(), locator, condition)
    }

    // =========================================================================
    // STATE CHECKS
    // =========================================================================

    /// Whether the element appears in the view hierarchy
    #[must_use]
    pub fn is_element_present(&self, locator: &Locator) -> bool {
        self.wait(locator, ElementCondition::Present).succeeded()
    }

    /// Whether the element is displayed
    #[must_use]
    pub fn is_element_displayed(&self, locator: &Locator) -> bool {
        self.wait(locator, ElementCondition::Visible).succeeded()
    }

    /// Whether the element is displayed and enabled
    #[must_use]
    pub fn is_element_clickable(&self, locator: &Locator) -> bool {
        self.wait(locator, ElementCondition::Clickable).succeeded()
    }

    /// Whether the element is absent or hidden
    #[must_use]
    pub fn verify_element_not_present(&self, locator: &Locator) -> bool {
        self.wait(locator, ElementCondition::Invisible).succeeded()
    }

    /// Whether the element is present and selected / checked
    #[must_use]
    pub fn is_element_checked(&self, locator: &Locator) -> bool {
        let Some(element) = self.get_element(locator) else {
            return false;
        };
        match self.session().is_selected(&element) {
            Ok(true) => true,
            Ok(false) => {
                tracing::error!("Element is not selected/ checked with {locator}");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Unable to read selection state with {locator}");
                false
            }
        }
    }

    /// Whether every locator is present. All locators are checked and
    /// each missing one is logged.
    #[must_use]
    pub fn verify_elements_located(&self, locators: &[Locator]) -> bool {
        locators.iter().fold(true, |all, locator| {
            let present = self.is_element_present(locator);
            if !present {
                tracing::error!("Element not found with {locator}");
            }
            all && present
        })
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// The element, once present
    #[must_use]
    pub fn get_element(&self, locator: &Locator) -> Option<ElementHandle> {
        let element = self.wait(locator, ElementCondition::Present).into_element();
        if element.is_none() {
            tracing::error!("Element not found with {locator}");
        }
        element
    }

    /// Every matching element, once at least one is present
    #[must_use]
    pub fn get_list_of_elements(&self, locator: &Locator) -> Option<Vec<ElementHandle>> {
        if !self.is_element_present(locator) {
            tracing::error!("Elements not found with {locator}");
            return None;
        }
        match self.session().find_elements(locator) {
            Ok(elements) => Some(elements),
            Err(e) => {
                tracing::error!(error = %e, "Elements lookup failed with {locator}");
                None
            }
        }
    }

    /// Trimmed element text, falling back to `innerText` when empty
    #[must_use]
    pub fn get_text_from_element(&self, locator: &Locator) -> Option<String> {
        let element = self.get_element(locator)?;
        let text = match self.session().text(&element) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "Unable to read text with {locator}");
                return None;
            }
        };
        if text.is_empty() {
            return self
                .session()
                .attribute(&element, INNER_TEXT_ATTRIBUTE)
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Unable to read innerText with {locator}");
                    None
                });
        }
        tracing::info!("The text is: '{text}'");
        Some(text.trim().to_string())
    }

    /// Attribute value of the element
    #[must_use]
    pub fn get_attribute_value(&self, locator: &Locator, attribute: &str) -> Option<String> {
        let element = self.get_element(locator)?;
        let value = self
            .session()
            .attribute(&element, attribute)
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, attribute, "Unable to read attribute with {locator}");
                None
            });
        match &value {
            Some(v) => tracing::info!("{} value is: {v}", attribute.to_uppercase()),
            None => tracing::error!("{} value is empty.", attribute.to_uppercase()),
        }
        value
    }

    // =========================================================================
    // INTERACTIONS
    // =========================================================================

    fn click_after(&self, locator: &Locator, condition: ElementCondition, pointer: bool) -> bool {
        let Some(element) = self.wait(locator, condition).into_element() else {
            tracing::error!("Unable to click on the element with {locator}");
            return false;
        };
        let clicked = if pointer {
            self.session().move_to_and_click(&element)
        } else {
            self.session().click(&element)
        };
        match clicked {
            Ok(()) => {
                tracing::info!("Clicked on the element with {locator}");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Unable to click on the element with {locator}");
                false
            }
        }
    }

    /// Click the element once it is clickable
    pub fn click(&self, locator: &Locator) -> bool {
        self.click_after(locator, ElementCondition::Clickable, false)
    }

    /// Click the element as soon as it is present
    pub fn click_when_present(&self, locator: &Locator) -> bool {
        self.click_after(locator, ElementCondition::Present, false)
    }

    /// Move the pointer to the element and click there, for elements that
    /// do not take a direct click
    pub fn move_to_element_and_click(&self, locator: &Locator) -> bool {
        self.click_after(locator, ElementCondition::Clickable, true)
    }

    /// Clear the field and type `text`
    pub fn enter_text(&self, locator: &Locator, text: &str) -> bool {
        let Some(element) = self.get_element(locator) else {
            return false;
        };
        let typed = self
            .session()
            .clear(&element)
            .and_then(|()| self.session().send_keys(&element, text));
        match typed {
            Ok(()) => {
                tracing::info!("Sent '{text}' as test data to the element with {locator}");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Unable to enter text into the element with {locator}");
                false
            }
        }
    }

    /// Navigate back
    pub fn navigate_back(&self) -> bool {
        match self.session().back() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Unable to navigate back");
                false
            }
        }
    }

    fn scroll(&self, direction: ScrollDirection, scroll_view: &str, class_name: &str, text: &str) -> bool {
        let expression = scroll_expression(direction, scroll_view, class_name, text);
        match self
            .session()
            .find_element(&Locator::android_uiautomator(expression))
        {
            Ok(_) => {
                tracing::info!(?direction, "Scrolling into the view.");
                true
            }
            Err(e) => {
                tracing::error!(?direction, error = %e, "Exception occurred while scrolling into the view");
                false
            }
        }
    }

    /// Scroll a vertical list until the element with `text` is in view
    pub fn vertical_scroll(&self, scroll_view: &str, class_name: &str, text: &str) -> bool {
        self.scroll(ScrollDirection::Vertical, scroll_view, class_name, text)
    }

    /// Scroll a horizontal list until the element with `text` is in view
    pub fn horizontal_scroll(&self, scroll_view: &str, class_name: &str, text: &str) -> bool {
        self.scroll(ScrollDirection::Horizontal, scroll_view, class_name, text)
    }

    /// Save a PNG screenshot as `<initials>_<epoch millis>.png` under the
    /// screenshot directory and return its path.
    ///
    /// The path is returned even when saving fails; the failure is logged.
    pub fn take_screenshot(&self, initials: &str) -> PathBuf {
        let file_name = format!("{initials}_{}.png", chrono::Utc::now().timestamp_millis());
        let destination = self.screenshot_dir.join(file_name);
        let saved = std::fs::create_dir_all(&self.screenshot_dir)
            .map_err(crate::result::ProbeError::from)
            .and_then(|()| self.session().screenshot_png())
            .and_then(|png| std::fs::write(&destination, png).map_err(Into::into));
        match saved {
            Ok(()) => tracing::info!("Screenshot saved to directory: {}", destination.display()),
            Err(e) => tracing::error!(error = %e, "Unable to save screenshot"),
        }
        destination
    }

    // =========================================================================
    // TEXT VERIFICATION
    // =========================================================================

    /// Whether `expected` occurs in `actual`, ignoring case
    #[must_use]
    pub fn verify_text_contains(&self, actual: &str, expected: &str) -> bool {
        if actual.to_lowercase().contains(&expected.to_lowercase()) {
            tracing::info!("### VERIFICATION TEXT CONTAINS !!!");
            true
        } else {
            tracing::info!(actual, expected, "### VERIFICATION TEXT DOES NOT CONTAINS !!!");
            false
        }
    }

    /// Whether `actual` equals `expected`, ignoring case
    #[must_use]
    pub fn verify_text_match(&self, actual: &str, expected: &str) -> bool {
        if actual.to_lowercase() == expected.to_lowercase() {
            tracing::info!("### VERIFICATION TEXT MATCHED !!!");
            true
        } else {
            tracing::error!(actual, expected, "### VERIFICATION TEXT DOES NOT MATCHED !!!");
            false
        }
    }
}
