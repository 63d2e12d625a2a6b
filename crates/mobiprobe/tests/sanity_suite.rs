//! End-to-end runs of the sanity suite over a scripted session

#![allow(clippy::unwrap_used, clippy::expect_used)]

use mobiprobe::pages::{LoginLocators, RegistrationLocators};
use mobiprobe::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

fn project(stage_data: &str) -> (TempDir, ProjectLayout) {
    let dir = TempDir::new().unwrap();
    let layout = ProjectLayout::new(dir.path());
    std::fs::create_dir_all(dir.path().join("TestData")).unwrap();
    std::fs::write(&layout.test_data, stage_data).unwrap();
    (dir, layout)
}

const STAGE_DATA: &str = r#"{
    "test_sanity_101": {"run_mode": "Y", "test_data": {}},
    "test_sanity_102": {"run_mode": "Y", "test_data": {"phone_number": "9876543210"}}
}"#;

/// A device where every screen of both flows shows up immediately
fn happy_device() -> Arc<MockSession> {
    let mock = Arc::new(MockSession::new());
    let r = RegistrationLocators::android();
    for locator in [
        r.signup_button,
        r.phone_number_input,
        r.continue_button,
        r.card_link,
        r.first_name_input,
        r.last_name_input,
        r.dob_input,
        r.next_button,
        r.submit_button,
        r.permission_grant_button,
    ] {
        mock.add_element(MockElement::new(locator));
    }
    mock.set_screenshot(vec![0x89, b'P', b'N', b'G']);
    mock
}

fn runner(layout: ProjectLayout) -> SuiteRunner {
    SuiteRunner::new(layout).with_wait_options(WaitOptions::new().with_timeout(100).with_poll_interval(10))
}

#[test]
fn test_full_suite_passes() {
    let (_dir, layout) = project(STAGE_DATA);
    let mock = happy_device();
    let ctx = SessionContext::new(mock.clone(), Platform::Android);

    let results = runner(layout).run(&ctx, &sanity_cases()).unwrap();
    assert_eq!(results.total(), 2);
    assert!(results.all_passed(), "{:?}", results.failures());

    let history = mock.history();
    assert_eq!(history.first().map(String::as_str), Some("reset"));
    assert_eq!(history.last().map(String::as_str), Some("quit"));
    assert_eq!(history.iter().filter(|c| *c == "reset").count(), 3);
    assert_eq!(
        mock.typed_text("com.fampay.in.debug:id/phone_number_input").as_deref(),
        None,
        "reset clears typed text"
    );
}

#[test]
fn test_login_marker_runs_one_case() {
    let (_dir, layout) = project(STAGE_DATA);
    let mock = happy_device();
    let ctx = SessionContext::new(mock.clone(), Platform::BsAndroid);

    let results = runner(layout)
        .with_marker(Some(Marker::Login))
        .run(&ctx, &sanity_cases())
        .unwrap();
    assert_eq!(results.total(), 1);
    assert_eq!(results.results[0].name, "test_sanity_102");
    assert_eq!(results.passed_count(), 1);
}

#[test]
fn test_disabled_run_mode_skips() {
    let (_dir, layout) = project(
        r#"{
            "test_sanity_101": {"run_mode": "N", "test_data": {}},
            "test_sanity_102": {"run_mode": "Y", "test_data": {"phone_number": "9876543210"}}
        }"#,
    );
    let ctx = SessionContext::new(happy_device(), Platform::Ios);
    let results = runner(layout).run(&ctx, &sanity_cases()).unwrap();
    assert_eq!(results.skipped_count(), 1);
    assert_eq!(results.results[0].status, TestStatus::Skipped);
    assert_eq!(results.passed_count(), 1);
}

#[test]
fn test_missing_phone_number_fails_login_case() {
    let (_dir, layout) = project(r#"{"test_sanity_102": {"run_mode": "Y", "test_data": {}}}"#);
    let ctx = SessionContext::new(happy_device(), Platform::Android);
    let results = runner(layout)
        .with_marker(Some(Marker::Login))
        .run(&ctx, &sanity_cases())
        .unwrap();
    assert_eq!(results.failed_count(), 1);
    assert!(results.results[0]
        .error
        .as_deref()
        .unwrap()
        .contains("phone_number"));
}

#[test]
fn test_registration_fails_without_phone_screen() {
    let (dir, layout) = project(STAGE_DATA);
    let mock = Arc::new(MockSession::new());
    mock.add_element(MockElement::new(RegistrationLocators::android().signup_button));
    mock.set_screenshot(vec![1]);
    let ctx = SessionContext::new(mock.clone(), Platform::Android);

    let results = runner(layout)
        .with_marker(Some(Marker::Registration))
        .run(&ctx, &sanity_cases())
        .unwrap();
    assert_eq!(results.failed_count(), 1);
    assert!(results.results[0]
        .error
        .as_deref()
        .unwrap()
        .contains("verify navigation to registration page"));
    assert!(mock.was_called("screenshot"));
    assert!(dir.path().join("Logs/Screenshots").read_dir().unwrap().next().is_some());
}

#[test]
fn test_initial_reset_failure_aborts() {
    let (_dir, layout) = project(STAGE_DATA);
    let mock = Arc::new(MockSession::new());
    mock.fail_with("session not created");
    let ctx = SessionContext::new(mock, Platform::Android);
    assert!(runner(layout).run(&ctx, &sanity_cases()).is_err());
}

#[test]
fn test_pages_follow_platform() {
    let mock = Arc::new(MockSession::new());
    for (platform, variant) in [
        (Platform::Android, PlatformVariant::Android),
        (Platform::BsAndroid, PlatformVariant::Android),
        (Platform::Ios, PlatformVariant::Ios),
        (Platform::BsIos, PlatformVariant::Ios),
    ] {
        let ctx = SessionContext::new(mock.clone(), platform);
        let actions = UiActions::new(ctx, "shots");
        assert_eq!(LoginPage::instance(actions.clone()).variant(), variant);
        assert_eq!(RegistrationPage::instance(actions).variant(), variant);
    }
    assert_eq!(LoginLocators::android(), LoginLocators::ios());
}
