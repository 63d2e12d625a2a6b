//! Driver factory - builds a remote session for a platform.
//!
//! Local platforms talk to an Appium server on the loopback interface and
//! point the `app` capability at a binary under the project's app
//! directory. Cloud platforms talk to the BrowserStack hub and carry
//! account credentials taken from `BS_USERNAME` / `BS_KEY`.

use crate::config::ProjectLayout;
use crate::platform::Platform;
use crate::result::{ProbeError, ProbeResult};
use crate::session::SessionContext;
use crate::test_data::{CapabilityMap, DataReader};
use crate::webdriver::RemoteSession;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Appium server used for `android` and `ios`
pub const LOCAL_APPIUM_SERVER: &str = "http://127.0.0.1:4723/wd/hub";

/// BrowserStack hub used for `bs_android` and `bs_ios`
pub const BROWSERSTACK_SERVER: &str = "http://hub-cloud.browserstack.com/wd/hub";

/// Environment variable holding the BrowserStack user name
pub const BS_USERNAME_ENV: &str = "BS_USERNAME";

/// Environment variable holding the BrowserStack access key
pub const BS_KEY_ENV: &str = "BS_KEY";

/// BrowserStack account credentials
#[derive(Clone, PartialEq, Eq, Default)]
pub struct CloudCredentials {
    /// Account user name
    pub user: Option<String>,
    /// Access key
    pub key: Option<String>,
}

impl CloudCredentials {
    /// Read credentials from `BS_USERNAME` / `BS_KEY`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            user: std::env::var(BS_USERNAME_ENV).ok(),
            key: std::env::var(BS_KEY_ENV).ok(),
        }
    }
}

impl std::fmt::Debug for CloudCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudCredentials")
            .field("user", &self.user)
            .field("key", &self.key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Creates remote sessions for one platform.
#[derive(Debug, Clone)]
pub struct DriverFactory {
    platform: Platform,
    layout: ProjectLayout,
    local_server: String,
    cloud_server: String,
    credentials: Option<CloudCredentials>,
}

impl DriverFactory {
    /// Factory for `platform` using the given project layout
    #[must_use]
    pub fn new(platform: Platform, layout: ProjectLayout) -> Self {
        Self {
            platform,
            layout,
            local_server: LOCAL_APPIUM_SERVER.to_string(),
            cloud_server: BROWSERSTACK_SERVER.to_string(),
            credentials: None,
        }
    }

    /// Override the local Appium server URL
    #[must_use]
    pub fn with_local_server(mut self, url: impl Into<String>) -> Self {
        self.local_server = url.into();
        self
    }

    /// Override the cloud hub URL
    #[must_use]
    pub fn with_cloud_server(mut self, url: impl Into<String>) -> Self {
        self.cloud_server = url.into();
        self
    }

    /// Use explicit cloud credentials instead of the environment
    #[must_use]
    pub fn with_credentials(mut self, credentials: CloudCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Target platform
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Endpoint sessions are created against
    #[must_use]
    pub fn endpoint(&self) -> &str {
        if self.platform.is_cloud() {
            &self.cloud_server
        } else {
            &self.local_server
        }
    }

    /// Capability set for the platform with the app path or cloud
    /// credentials filled in.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::MissingCapabilities`] when the platform's
    /// capability file is missing or malformed.
    pub fn resolve_capabilities(&self) -> ProbeResult<CapabilityMap> {
        let reader = DataReader::new(&self.layout);
        let mut caps = reader
            .get_capabilities(self.platform)
            .ok_or_else(|| ProbeError::MissingCapabilities {
                platform: self.platform.to_string(),
            })?;

        if self.platform.is_cloud() {
            let credentials = self
                .credentials
                .clone()
                .unwrap_or_else(CloudCredentials::from_env);
            if credentials.user.is_none() || credentials.key.is_none() {
                tracing::warn!(
                    platform = %self.platform,
                    "{BS_USERNAME_ENV} / {BS_KEY_ENV} not set"
                );
            }
            let _ = caps.insert(
                "browserstack.user".to_string(),
                credentials.user.map_or(Value::Null, Value::String),
            );
            let _ = caps.insert(
                "browserstack.key".to_string(),
                credentials.key.map_or(Value::Null, Value::String),
            );
        } else {
            match caps.get("app").and_then(Value::as_str) {
                Some(app) => {
                    let location = absolute_path(&self.layout.app_dir.join(app));
                    let _ = caps.insert(
                        "app".to_string(),
                        Value::String(location.display().to_string()),
                    );
                }
                None => tracing::warn!(platform = %self.platform, "capabilities carry no app"),
            }
        }
        Ok(caps)
    }

    /// Start a remote session for the platform.
    ///
    /// # Errors
    ///
    /// Missing capabilities and connection or session-creation failures
    /// are returned as-is; there is no retry.
    pub fn get_session(&self) -> ProbeResult<SessionContext> {
        let caps = self.resolve_capabilities()?;
        let endpoint = self.endpoint();
        tracing::info!(platform = %self.platform, endpoint, "creating session");
        let session = RemoteSession::start(endpoint, &caps)?;
        tracing::info!(session_id = session.session_id(), "session created");
        Ok(SessionContext::new(Arc::new(session), self.platform))
    }
}

/// Resolve `path` against the working directory, dropping `.` segments.
fn absolute_path(path: &Path) -> PathBuf {
    let anchored = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot resolve working directory");
                return path.to_path_buf();
            }
        }
    };
    anchored
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn project_with_caps(file: &str, caps: &Value) -> (TempDir, ProjectLayout) {
        let dir = TempDir::new().unwrap();
        let layout = ProjectLayout::new(dir.path());
        std::fs::create_dir_all(&layout.caps_dir).unwrap();
        std::fs::write(layout.caps_dir.join(file), caps.to_string()).unwrap();
        (dir, layout)
    }

    mod endpoint_tests {
        use super::*;

        #[test]
        fn test_local_platforms_use_appium() {
            for platform in [Platform::Android, Platform::Ios] {
                let factory = DriverFactory::new(platform, ProjectLayout::default());
                assert_eq!(factory.endpoint(), LOCAL_APPIUM_SERVER);
            }
        }

        #[test]
        fn test_cloud_platforms_use_hub() {
            for platform in [Platform::BsAndroid, Platform::BsIos] {
                let factory = DriverFactory::new(platform, ProjectLayout::default());
                assert_eq!(factory.endpoint(), BROWSERSTACK_SERVER);
            }
        }

        #[test]
        fn test_server_overrides() {
            let factory = DriverFactory::new(Platform::Android, ProjectLayout::default())
                .with_local_server("http://10.0.0.5:4723/wd/hub");
            assert_eq!(factory.endpoint(), "http://10.0.0.5:4723/wd/hub");
        }
    }

    mod capability_tests {
        use super::*;

        #[test]
        fn test_local_app_path_rewritten() {
            let (_dir, layout) = project_with_caps(
                "android-local.json",
                &json!({"platformName": "Android", "app": "app-debug.apk"}),
            );
            let expected = layout.app_dir.join("app-debug.apk").display().to_string();
            let caps = DriverFactory::new(Platform::Android, layout)
                .resolve_capabilities()
                .unwrap();
            assert_eq!(caps["app"], Value::String(expected));
            assert_eq!(caps["platformName"], "Android");
            assert!(!caps.contains_key("browserstack.user"));
        }

        #[test]
        fn test_relative_app_dir_made_absolute() {
            let (_dir, layout) = project_with_caps(
                "android-local.json",
                &json!({"platformName": "Android", "app": "app-debug.apk"}),
            );
            let layout = layout.with_app_dir("./MobileApp");
            let caps = DriverFactory::new(Platform::Android, layout)
                .resolve_capabilities()
                .unwrap();
            let app = caps["app"].as_str().unwrap();
            let expected = std::env::current_dir()
                .unwrap()
                .join("MobileApp")
                .join("app-debug.apk");
            assert!(Path::new(app).is_absolute());
            assert_eq!(Path::new(app), expected.as_path());
        }

        #[test]
        fn test_absolute_path_keeps_absolute_input() {
            let dir = TempDir::new().unwrap();
            let app = dir.path().join("app.apk");
            assert_eq!(absolute_path(&app), app);
        }

        #[test]
        fn test_cloud_credentials_injected() {
            let (_dir, layout) = project_with_caps(
                "browserstack-ios.json",
                &json!({"app": "bs://abc123", "device": "iPhone 14"}),
            );
            let caps = DriverFactory::new(Platform::BsIos, layout)
                .with_credentials(CloudCredentials {
                    user: Some("qa-user".to_string()),
                    key: Some("s3cret".to_string()),
                })
                .resolve_capabilities()
                .unwrap();
            assert_eq!(caps["browserstack.user"], "qa-user");
            assert_eq!(caps["browserstack.key"], "s3cret");
            assert_eq!(caps["app"], "bs://abc123");
        }

        #[test]
        fn test_missing_credentials_become_null() {
            let (_dir, layout) =
                project_with_caps("browserstack-android.json", &json!({"app": "bs://x"}));
            let caps = DriverFactory::new(Platform::BsAndroid, layout)
                .with_credentials(CloudCredentials::default())
                .resolve_capabilities()
                .unwrap();
            assert_eq!(caps["browserstack.user"], Value::Null);
        }

        #[test]
        fn test_missing_capability_file() {
            let dir = TempDir::new().unwrap();
            let err = DriverFactory::new(Platform::Ios, ProjectLayout::new(dir.path()))
                .resolve_capabilities()
                .unwrap_err();
            assert!(matches!(err, ProbeError::MissingCapabilities { .. }));
        }

        #[test]
        fn test_credentials_debug_hides_key() {
            let creds = CloudCredentials {
                user: Some("u".to_string()),
                key: Some("topsecret".to_string()),
            };
            assert!(!format!("{creds:?}").contains("topsecret"));
        }
    }

    mod session_tests {
        use super::*;

        #[test]
        fn test_unreachable_server_propagates() {
            let (_dir, layout) = project_with_caps(
                "android-local.json",
                &json!({"platformName": "Android", "app": "app.apk"}),
            );
            let err = DriverFactory::new(Platform::Android, layout)
                .with_local_server("http://127.0.0.1:9/wd/hub")
                .get_session()
                .unwrap_err();
            assert!(matches!(err, ProbeError::SessionCreation { .. }));
        }
    }
}
