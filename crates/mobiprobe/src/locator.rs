//! Locator abstraction for element selection.
//!
//! A [`Locator`] pairs a selector string with a [`LocatorStrategy`]. Page
//! objects declare their locators once; actions resolve them against the
//! live session through the wait primitive.
//!
//! Strategy names are resolved permissively: anything the resolver does not
//! recognise becomes [`LocatorStrategy::Id`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Strategy used by the remote end to find an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStrategy {
    /// Resource id (`com.example:id/button`)
    #[default]
    Id,
    /// XPath expression
    XPath,
    /// Element name
    Name,
    /// Class name (`android.widget.TextView`, `XCUIElementTypeButton`)
    ClassName,
    /// Full link text
    LinkText,
    /// Partial link text
    PartialLinkText,
    /// Accessibility id (content-desc on Android, name on iOS)
    AccessibilityId,
    /// UiAutomator selector expression (Android only)
    AndroidUiAutomator,
}

impl LocatorStrategy {
    /// All strategies, in resolver table order.
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::XPath,
        Self::Name,
        Self::ClassName,
        Self::LinkText,
        Self::PartialLinkText,
        Self::AccessibilityId,
        Self::AndroidUiAutomator,
    ];

    /// Resolve a locator-type string.
    ///
    /// Matching is case-insensitive. Unknown strings fall back to `Id`
    /// without an error.
    #[must_use]
    pub fn resolve(locator_type: &str) -> Self {
        match locator_type.trim().to_ascii_lowercase().as_str() {
            "xpath" => Self::XPath,
            "name" => Self::Name,
            "class" => Self::ClassName,
            "link" => Self::LinkText,
            "partial_link" => Self::PartialLinkText,
            "accessibility_id" => Self::AccessibilityId,
            "android_uiautomator" => Self::AndroidUiAutomator,
            _ => Self::Id,
        }
    }

    /// Short type name as written in page-object declarations.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::XPath => "xpath",
            Self::Name => "name",
            Self::ClassName => "class",
            Self::LinkText => "link",
            Self::PartialLinkText => "partial_link",
            Self::AccessibilityId => "accessibility_id",
            Self::AndroidUiAutomator => "android_uiautomator",
        }
    }

    /// The `using` value sent on the wire.
    #[must_use]
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::XPath => "xpath",
            Self::Name => "name",
            Self::ClassName => "class name",
            Self::LinkText => "link text",
            Self::PartialLinkText => "partial link text",
            Self::AccessibilityId => "accessibility id",
            Self::AndroidUiAutomator => "-android uiautomator",
        }
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (selector, strategy) pair identifying a UI element.
///
/// Locators are values: the builder methods return a new locator and leave
/// the declared one untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    selector: String,
    strategy: LocatorStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
}

impl Locator {
    /// Create a locator from a selector and a locator-type string.
    #[must_use]
    pub fn new(selector: impl Into<String>, locator_type: &str) -> Self {
        Self::with_strategy(selector, LocatorStrategy::resolve(locator_type))
    }

    /// Create a locator with an already-resolved strategy.
    #[must_use]
    pub fn with_strategy(selector: impl Into<String>, strategy: LocatorStrategy) -> Self {
        Self {
            selector: selector.into(),
            strategy,
            timeout_ms: None,
        }
    }

    /// Resource-id locator
    #[must_use]
    pub fn id(selector: impl Into<String>) -> Self {
        Self::with_strategy(selector, LocatorStrategy::Id)
    }

    /// XPath locator
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::with_strategy(selector, LocatorStrategy::XPath)
    }

    /// Accessibility-id locator
    #[must_use]
    pub fn accessibility_id(selector: impl Into<String>) -> Self {
        Self::with_strategy(selector, LocatorStrategy::AccessibilityId)
    }

    /// UiAutomator locator
    #[must_use]
    pub fn android_uiautomator(expression: impl Into<String>) -> Self {
        Self::with_strategy(expression, LocatorStrategy::AndroidUiAutomator)
    }

    /// Override the wait timeout for this locator.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout_ms: Some(timeout.as_millis() as u64),
            ..self.clone()
        }
    }

    /// The selector string
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The resolved strategy
    #[must_use]
    pub const fn strategy(&self) -> LocatorStrategy {
        self.strategy
    }

    /// Per-locator timeout override, if any
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "locator_properties: {} and locator_type: {}",
            self.selector, self.strategy
        )
    }
}
