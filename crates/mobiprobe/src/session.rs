//! MobileSession - abstract remote-driver session.
//!
//! Page objects and actions talk to the app under test only through the
//! [`MobileSession`] trait, so the remote WebDriver client can be swapped for
//! [`MockSession`] in unit tests.
//!
//! The session is created once per run and shared by reference through a
//! [`SessionContext`]; nothing owns it but the context.

use crate::locator::Locator;
use crate::platform::Platform;
use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Reference to an element on the remote end
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Element reference id assigned by the remote end
    pub id: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Direction of a UiScrollable scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Scroll a vertical list
    Vertical,
    /// Scroll a horizontal list
    Horizontal,
}

/// Operations the framework needs from a remote session.
///
/// All calls block. Element lookups report a missing element as
/// [`ProbeError::NoSuchElement`]; a detached reference as
/// [`ProbeError::StaleElement`].
pub trait MobileSession: Send + Sync + fmt::Debug {
    /// Find the first element matching the locator
    fn find_element(&self, locator: &Locator) -> ProbeResult<ElementHandle>;

    /// Find every element matching the locator (possibly none)
    fn find_elements(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>>;

    /// Whether the element is displayed
    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// Whether the element is enabled
    fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// Whether the element is selected / checked
    fn is_selected(&self, element: &ElementHandle) -> ProbeResult<bool>;

    /// Click the element
    fn click(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Move the pointer to the element centre and click there
    fn move_to_and_click(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Clear a text field
    fn clear(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Type text into the element
    fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()>;

    /// Visible text of the element
    fn text(&self, element: &ElementHandle) -> ProbeResult<String>;

    /// Attribute value, `None` when the attribute is absent
    fn attribute(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>>;

    /// Navigate back
    fn back(&self) -> ProbeResult<()>;

    /// Reset the app under test to a fresh state
    fn reset(&self) -> ProbeResult<()>;

    /// PNG screenshot of the current screen
    fn screenshot_png(&self) -> ProbeResult<Vec<u8>>;

    /// End the session
    fn quit(&self) -> ProbeResult<()>;
}

/// A live session plus the platform it was created for.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session: Arc<dyn MobileSession>,
    platform: Platform,
}

impl SessionContext {
    /// Wrap a session for the given platform
    pub fn new(session: Arc<dyn MobileSession>, platform: Platform) -> Self {
        Self { session, platform }
    }

    /// The shared session handle
    #[must_use]
    pub fn session(&self) -> &Arc<dyn MobileSession> {
        &self.session
    }

    /// Platform tag of the session
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }
}

// =============================================================================
// MOCK SESSION
// =============================================================================

/// Scripted state of one mock element
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Locator the element answers to
    pub locator: Locator,
    /// Text content
    pub text: String,
    /// Attribute values
    pub attributes: HashMap<String, String>,
    /// Displayed flag
    pub displayed: bool,
    /// Enabled flag
    pub enabled: bool,
    /// Selected flag
    pub selected: bool,
    /// Element is only findable after this much time since it was added
    pub appears_after: Duration,
    /// Element disappears after this much time since it was added
    pub disappears_after: Option<Duration>,
}

impl MockElement {
    /// A displayed, enabled element with empty text
    #[must_use]
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            text: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            enabled: true,
            selected: false,
            appears_after: Duration::ZERO,
            disappears_after: None,
        }
    }

    /// Set text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set displayed flag
    #[must_use]
    pub const fn displayed(mut self, displayed: bool) -> Self {
        self.displayed = displayed;
        self
    }

    /// Set enabled flag
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set selected flag
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Make the element appear only after a delay
    #[must_use]
    pub const fn appears_after(mut self, delay: Duration) -> Self {
        self.appears_after = delay;
        self
    }

    /// Make the element vanish after a delay
    #[must_use]
    pub const fn disappears_after(mut self, delay: Duration) -> Self {
        self.disappears_after = Some(delay);
        self
    }
}

#[derive(Debug)]
struct MockEntry {
    element: MockElement,
    added_at: Instant,
}

impl MockEntry {
    fn is_live(&self) -> bool {
        let age = self.added_at.elapsed();
        age >= self.element.appears_after
            && self.element.disappears_after.map_or(true, |d| age < d)
    }
}

#[derive(Debug, Default)]
struct MockState {
    entries: Vec<MockEntry>,
    history: Vec<String>,
    typed: HashMap<String, String>,
    screenshot: Option<Vec<u8>>,
    failure: Option<String>,
    find_calls: usize,
}

/// In-memory session for unit testing page objects and waits.
///
/// Elements are matched by exact locator (selector and strategy). Element
/// handle ids are the index of the element in insertion order.
#[derive(Debug, Default)]
pub struct MockSession {
    state: Mutex<MockState>,
}

impl MockSession {
    /// Create an empty mock session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A poisoned lock only means another test thread panicked mid-call.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Add a scripted element
    pub fn add_element(&self, element: MockElement) {
        self.state().entries.push(MockEntry {
            element,
            added_at: Instant::now(),
        });
    }

    /// Set the PNG bytes returned by `screenshot_png`
    pub fn set_screenshot(&self, png: Vec<u8>) {
        self.state().screenshot = Some(png);
    }

    /// Make every subsequent call fail with a non-transient WebDriver error
    pub fn fail_with(&self, message: impl Into<String>) {
        self.state().failure = Some(message.into());
    }

    /// Calls made so far
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().history.clone()
    }

    /// Whether a call with this prefix was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.state().history.iter().any(|c| c.starts_with(prefix))
    }

    /// Number of element lookups performed
    #[must_use]
    pub fn find_calls(&self) -> usize {
        self.state().find_calls
    }

    /// Text typed into the element matching `selector`
    #[must_use]
    pub fn typed_text(&self, selector: &str) -> Option<String> {
        self.state().typed.get(selector).cloned()
    }

    fn check_failure(state: &MockState) -> ProbeResult<()> {
        match &state.failure {
            Some(message) => Err(ProbeError::WebDriver {
                code: "unknown error".to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn with_element<T>(
        &self,
        element: &ElementHandle,
        call: &str,
        f: impl FnOnce(&mut MockState, usize) -> T,
    ) -> ProbeResult<T> {
        let mut state = self.state();
        Self::check_failure(&state)?;
        state.history.push(format!("{call}:{}", element.id));
        let index: usize = element.id.parse().map_err(|_| ProbeError::StaleElement {
            element_id: element.id.clone(),
        })?;
        if state.entries.get(index).is_some_and(MockEntry::is_live) {
            Ok(f(&mut *state, index))
        } else {
            Err(ProbeError::StaleElement {
                element_id: element.id.clone(),
            })
        }
    }
}

impl MobileSession for MockSession {
    fn find_element(&self, locator: &Locator) -> ProbeResult<ElementHandle> {
        self.find_elements(locator)?
            .into_iter()
            .next()
            .ok_or_else(|| ProbeError::NoSuchElement {
                selector: locator.selector().to_string(),
            })
    }

    fn find_elements(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        let mut state = self.state();
        Self::check_failure(&state)?;
        state.find_calls += 1;
        state.history.push(format!("find:{}", locator.selector()));
        Ok(state
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.is_live()
                    && e.element.locator.selector() == locator.selector()
                    && e.element.locator.strategy() == locator.strategy()
            })
            .map(|(i, _)| ElementHandle::new(i.to_string()))
            .collect())
    }

    fn is_displayed(&self, element: &ElementHandle) -> ProbeResult<bool> {
        self.with_element(element, "displayed", |s, i| s.entries[i].element.displayed)
    }

    fn is_enabled(&self, element: &ElementHandle) -> ProbeResult<bool> {
        self.with_element(element, "enabled", |s, i| s.entries[i].element.enabled)
    }

    fn is_selected(&self, element: &ElementHandle) -> ProbeResult<bool> {
        self.with_element(element, "selected", |s, i| s.entries[i].element.selected)
    }

    fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        self.with_element(element, "click", |_, _| ())
    }

    fn move_to_and_click(&self, element: &ElementHandle) -> ProbeResult<()> {
        self.with_element(element, "move_click", |_, _| ())
    }

    fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        self.with_element(element, "clear", |s, i| {
            let selector = s.entries[i].element.locator.selector().to_string();
            let _ = s.typed.insert(selector, String::new());
        })
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        self.with_element(element, "send_keys", |s, i| {
            let selector = s.entries[i].element.locator.selector().to_string();
            s.typed.entry(selector).or_default().push_str(text);
        })
    }

    fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        self.with_element(element, "text", |s, i| s.entries[i].element.text.clone())
    }

    fn attribute(&self, element: &ElementHandle, name: &str) -> ProbeResult<Option<String>> {
        self.with_element(element, "attribute", |s, i| {
            s.entries[i].element.attributes.get(name).cloned()
        })
    }

    fn back(&self) -> ProbeResult<()> {
        let mut state = self.state();
        Self::check_failure(&state)?;
        state.history.push("back".to_string());
        Ok(())
    }

    fn reset(&self) -> ProbeResult<()> {
        let mut state = self.state();
        Self::check_failure(&state)?;
        state.history.push("reset".to_string());
        state.typed.clear();
        Ok(())
    }

    fn screenshot_png(&self) -> ProbeResult<Vec<u8>> {
        let mut state = self.state();
        Self::check_failure(&state)?;
        state.history.push("screenshot".to_string());
        state
            .screenshot
            .clone()
            .ok_or_else(|| ProbeError::ScreenshotError {
                message: "No mock screenshot set".to_string(),
            })
    }

    fn quit(&self) -> ProbeResult<()> {
        let mut state = self.state();
        state.history.push("quit".to_string());
        Ok(())
    }
}
