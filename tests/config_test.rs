//! Settings layering tests
//!
//! These touch process environment variables, so they run serially.

use mlm_admin::config::Settings;
use serial_test::serial;
use tokio_test::assert_ok;

const BASE_URL_VAR: &str = "MLM_ADMIN__API__BASE_URL";
const MARKERS_VAR: &str = "MLM_ADMIN__API__AUTH_ERROR_MARKERS";
const SECTION_VAR: &str = "MLM_ADMIN__DASHBOARD__DEFAULT_SECTION";

#[test]
#[serial]
fn test_environment_overrides_defaults() {
    std::env::set_var(BASE_URL_VAR, "http://127.0.0.1:4000");
    std::env::set_var(MARKERS_VAR, "expired,forbidden");

    let settings = Settings::new();
    std::env::remove_var(BASE_URL_VAR);
    std::env::remove_var(MARKERS_VAR);

    let settings = settings.expect("settings should load");
    assert_eq!(settings.api.base_url, "http://127.0.0.1:4000");
    assert_eq!(settings.api.auth_error_markers, vec!["expired", "forbidden"]);
    assert_eq!(settings.session.token_key, "token");
    assert_ok!(settings.validate());
}

#[test]
#[serial]
fn test_unknown_default_section_fails_validation() {
    std::env::set_var(SECTION_VAR, "autopay");
    let settings = Settings::new();
    std::env::remove_var(SECTION_VAR);

    let settings = settings.expect("settings should load");
    assert!(settings.validate().is_err());
}
