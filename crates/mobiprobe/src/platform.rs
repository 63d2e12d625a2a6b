//! Platform tags and the Android/iOS variant they select.

use crate::result::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target platform for a run.
///
/// Selects the capability file, the execution endpoint and the page-object
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Local Appium server, Android device or emulator
    Android,
    /// Local Appium server, iOS device or simulator
    Ios,
    /// BrowserStack App Automate, Android
    BsAndroid,
    /// BrowserStack App Automate, iOS
    BsIos,
}

impl Platform {
    /// Every supported platform tag.
    pub const ALL: [Self; 4] = [Self::Android, Self::Ios, Self::BsAndroid, Self::BsIos];

    /// The tag string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::BsAndroid => "bs_android",
            Self::BsIos => "bs_ios",
        }
    }

    /// Whether the session runs on the BrowserStack cloud.
    #[must_use]
    pub const fn is_cloud(&self) -> bool {
        matches!(self, Self::BsAndroid | Self::BsIos)
    }

    /// Page-object variant for this platform.
    #[must_use]
    pub const fn variant(&self) -> PlatformVariant {
        match self {
            Self::Android | Self::BsAndroid => PlatformVariant::Android,
            Self::Ios | Self::BsIos => PlatformVariant::Ios,
        }
    }

    /// Name of the capability file for this platform.
    #[must_use]
    pub const fn capability_file(&self) -> &'static str {
        match self {
            Self::Android => "android-local.json",
            Self::Ios => "ios-local.json",
            Self::BsAndroid => "browserstack-android.json",
            Self::BsIos => "browserstack-ios.json",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ProbeError;

    fn from_str(s: &str) -> ProbeResult<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == lowered)
            .ok_or_else(|| ProbeError::InvalidPlatform {
                value: s.to_string(),
            })
    }
}

/// The two page-object families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformVariant {
    /// Android-specialised page objects
    Android,
    /// iOS-specialised page objects
    Ios,
}

impl fmt::Display for PlatformVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Android => f.write_str("Android"),
            Self::Ios => f.write_str("iOS"),
        }
    }
}
