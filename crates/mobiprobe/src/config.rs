//! Project layout configuration

use std::path::{Path, PathBuf};

/// Default test data file, relative to the project root
pub const DEFAULT_TEST_DATA: &str = "TestData/stage_data.json";

/// Default capability directory, relative to the project root
pub const DEFAULT_CAPS_DIR: &str = "DesiredCaps";

/// Default app binary directory, relative to the project root
pub const DEFAULT_APP_DIR: &str = "MobileApp";

/// Default screenshot directory, relative to the project root
pub const DEFAULT_SCREENSHOT_DIR: &str = "Logs/Screenshots";

/// Where a test project keeps its data, capabilities, app binaries and
/// screenshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Project root
    pub root: PathBuf,
    /// Test data JSON file
    pub test_data: PathBuf,
    /// Directory holding one capability JSON file per platform
    pub caps_dir: PathBuf,
    /// Directory holding app binaries for local runs
    pub app_dir: PathBuf,
    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

impl ProjectLayout {
    /// Conventional layout under `root`
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            test_data: root.join(DEFAULT_TEST_DATA),
            caps_dir: root.join(DEFAULT_CAPS_DIR),
            app_dir: root.join(DEFAULT_APP_DIR),
            screenshot_dir: root.join(DEFAULT_SCREENSHOT_DIR),
            root,
        }
    }

    /// Override the test data file
    #[must_use]
    pub fn with_test_data(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_data = path.into();
        self
    }

    /// Override the capability directory
    #[must_use]
    pub fn with_caps_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.caps_dir = path.into();
        self
    }

    /// Override the app directory
    #[must_use]
    pub fn with_app_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_dir = path.into();
        self
    }

    /// Override the screenshot directory
    #[must_use]
    pub fn with_screenshot_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = path.into();
        self
    }
}
