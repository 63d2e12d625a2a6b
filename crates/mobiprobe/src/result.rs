//! Result and error types for Mobiprobe.

use thiserror::Error;

/// Result type for Mobiprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur in Mobiprobe
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Platform tag outside the supported set
    #[error("platform value must be one of [ios, android, bs_android, bs_ios], got {value:?}")]
    InvalidPlatform {
        /// The rejected value
        value: String,
    },

    /// Remote session could not be created
    #[error("Failed to create session at {endpoint}: {message}")]
    SessionCreation {
        /// Endpoint the session was requested from
        endpoint: String,
        /// Error message
        message: String,
    },

    /// Capability set missing or unreadable for a platform
    #[error("No capabilities available for platform {platform}")]
    MissingCapabilities {
        /// Platform tag
        platform: String,
    },

    /// The remote end answered with a W3C error
    #[error("WebDriver error ({code}): {message}")]
    WebDriver {
        /// W3C error code, e.g. "invalid selector"
        code: String,
        /// Error message
        message: String,
    },

    /// No element matched a locator
    #[error("No such element: {selector}")]
    NoSuchElement {
        /// Selector that matched nothing
        selector: String,
    },

    /// Element reference no longer attached to the view hierarchy
    #[error("Stale element reference: {element_id}")]
    StaleElement {
        /// Element reference id
        element_id: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    ScreenshotError {
        /// Error message
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Test data error
    #[error("Test data error: {message}")]
    TestData {
        /// Error message
        message: String,
    },

    /// Transport failure talking to the remote end
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Map a W3C error payload to the closest variant.
    #[must_use]
    pub fn from_w3c(code: &str, message: impl Into<String>, subject: &str) -> Self {
        match code {
            "no such element" => Self::NoSuchElement {
                selector: subject.to_string(),
            },
            "stale element reference" => Self::StaleElement {
                element_id: subject.to_string(),
            },
            _ => Self::WebDriver {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    /// Errors the polling loop swallows and retries on.
    #[must_use]
    pub const fn is_transient_lookup(&self) -> bool {
        matches!(self, Self::NoSuchElement { .. } | Self::StaleElement { .. })
    }
}
