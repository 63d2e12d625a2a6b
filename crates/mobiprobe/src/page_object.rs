//! Page Object Model support with per-platform variants.
//!
//! A page family implements [`PlatformPage`] with one constructor per
//! [`PlatformVariant`]; [`PlatformPage::instance`] picks the variant from
//! the session's platform tag. The variant is fixed for the lifetime of the
//! page object.

use crate::actions::UiActions;
use crate::platform::PlatformVariant;

/// A screen (or screen component) of the app under test.
///
/// # Example
///
/// ```ignore
/// struct WelcomePage {
///     actions: UiActions,
///     variant: PlatformVariant,
///     start_button: Locator,
/// }
///
/// impl PageObject for WelcomePage {
///     fn variant(&self) -> PlatformVariant {
///         self.variant
///     }
///
///     fn actions(&self) -> &UiActions {
///         &self.actions
///     }
/// }
/// ```
pub trait PageObject {
    /// Platform variant this page object was built for
    fn variant(&self) -> PlatformVariant;

    /// Element actions bound to the session
    fn actions(&self) -> &UiActions;

    /// Page name for logging
    fn page_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Navigate back from this page
    fn navigate_back(&self) -> bool {
        tracing::info!(page = self.page_name(), "navigating back");
        self.actions().navigate_back()
    }
}

/// Factory for a page family with Android and iOS variants.
pub trait PlatformPage: PageObject + Sized {
    /// Android variant
    fn android(actions: UiActions) -> Self;

    /// iOS variant
    fn ios(actions: UiActions) -> Self;

    /// Variant matching the session platform: `android` and `bs_android`
    /// get the Android variant, every other platform the iOS one.
    fn instance(actions: UiActions) -> Self {
        let platform = actions.context().platform();
        match platform.variant() {
            PlatformVariant::Android => Self::android(actions),
            PlatformVariant::Ios => Self::ios(actions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use crate::session::{MockSession, SessionContext};
    use std::sync::Arc;

    #[derive(Debug)]
    struct ProbePage {
        actions: UiActions,
        variant: PlatformVariant,
    }

    impl PageObject for ProbePage {
        fn variant(&self) -> PlatformVariant {
            self.variant
        }

        fn actions(&self) -> &UiActions {
            &self.actions
        }
    }

    impl PlatformPage for ProbePage {
        fn android(actions: UiActions) -> Self {
            Self {
                actions,
                variant: PlatformVariant::Android,
            }
        }

        fn ios(actions: UiActions) -> Self {
            Self {
                actions,
                variant: PlatformVariant::Ios,
            }
        }
    }

    fn page_for(platform: Platform, mock: &Arc<MockSession>) -> ProbePage {
        let ctx = SessionContext::new(mock.clone(), platform);
        ProbePage::instance(UiActions::new(ctx, "shots"))
    }

    #[test]
    fn test_dispatch_table() {
        let mock = Arc::new(MockSession::new());
        let expected = [
            (Platform::Android, PlatformVariant::Android),
            (Platform::BsAndroid, PlatformVariant::Android),
            (Platform::Ios, PlatformVariant::Ios),
            (Platform::BsIos, PlatformVariant::Ios),
        ];
        for (platform, variant) in expected {
            assert_eq!(page_for(platform, &mock).variant(), variant, "{platform}");
        }
    }

    #[test]
    fn test_page_name_default() {
        let page = page_for(Platform::Android, &Arc::new(MockSession::new()));
        assert!(page.page_name().ends_with("ProbePage"));
    }

    #[test]
    fn test_navigate_back_uses_session() {
        let mock = Arc::new(MockSession::new());
        let page = page_for(Platform::Ios, &mock);
        assert!(page.navigate_back());
        assert_eq!(mock.history(), vec!["back".to_string()]);
    }
}
