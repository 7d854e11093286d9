//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;
use crate::i18n::Language;
use crate::shell::Section;
use crate::utils::errors::{AdminError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_api_config(&settings.api)?;
    validate_realtime_config(&settings.realtime)?;
    validate_session_config(&settings.session)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;
    validate_dashboard_config(&settings.dashboard)?;

    Ok(())
}

fn validate_http_url(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AdminError::Config(format!("{} is required", what)));
    }

    let url = Url::parse(value)
        .map_err(|e| AdminError::Config(format!("{} is not a valid URL: {}", what, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AdminError::Config(format!(
            "{} must use http or https, got {}",
            what,
            url.scheme()
        )));
    }

    Ok(())
}

/// Validate backend API configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    validate_http_url(&config.base_url, "API base URL")?;

    if config.timeout_seconds == 0 {
        return Err(AdminError::Config(
            "API timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate realtime relay configuration
fn validate_realtime_config(config: &super::RealtimeConfig) -> Result<()> {
    if let Some(ref url) = config.url {
        validate_http_url(url, "Realtime URL")?;
    }

    if !config.path.starts_with('/') {
        return Err(AdminError::Config(
            "Realtime path must start with '/'".to_string()
        ));
    }

    if config.ack_timeout_seconds == 0 {
        return Err(AdminError::Config(
            "Acknowledgment timeout must be greater than 0".to_string()
        ));
    }

    let reconnect = &config.reconnect;
    if reconnect.initial_delay_ms == 0 || reconnect.initial_delay_ms > reconnect.max_delay_ms {
        return Err(AdminError::Config(
            "Reconnect initial delay must be positive and not exceed the max delay".to_string()
        ));
    }

    if reconnect.multiplier < 1.0 {
        return Err(AdminError::Config(
            "Reconnect multiplier must be at least 1.0".to_string()
        ));
    }

    if !(0.0..=1.0).contains(&reconnect.jitter) {
        return Err(AdminError::Config(
            "Reconnect jitter must be between 0.0 and 1.0".to_string()
        ));
    }

    Ok(())
}

/// Validate session storage configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.storage_path.is_empty() {
        return Err(AdminError::Config(
            "Session storage path is required".to_string()
        ));
    }

    if config.token_key.is_empty() || config.language_key.is_empty() {
        return Err(AdminError::Config(
            "Session storage keys must not be empty".to_string()
        ));
    }

    if config.token_key == config.language_key {
        return Err(AdminError::Config(
            "Token and language preference must use different storage keys".to_string()
        ));
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(AdminError::Config(
            "Default language is required".to_string()
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(AdminError::Config(
            "At least one supported language is required".to_string()
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(AdminError::Config(
            "Default language must be in supported languages list".to_string()
        ));
    }

    if let Some(unknown) = config
        .supported_languages
        .iter()
        .find(|code| Language::from_code(code).is_none())
    {
        return Err(AdminError::Config(format!("Unknown language code: {}", unknown)));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AdminError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(AdminError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

/// Validate dashboard shell configuration
fn validate_dashboard_config(config: &super::DashboardConfig) -> Result<()> {
    if Section::from_id(&config.default_section).is_none() {
        return Err(AdminError::Config(format!(
            "Unknown default section: {}",
            config.default_section
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut settings = Settings::default();
        settings.api.base_url = "ftp://backend".to_string();
        assert_matches!(validate_settings(&settings), Err(AdminError::Config(_)));
    }

    #[test]
    fn test_rejects_inverted_backoff() {
        let mut settings = Settings::default();
        settings.realtime.reconnect.initial_delay_ms = 60_000;
        assert_matches!(validate_settings(&settings), Err(AdminError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_language_and_section() {
        let mut settings = Settings::default();
        settings.i18n.supported_languages.push("fr".to_string());
        assert_matches!(validate_settings(&settings), Err(AdminError::Config(msg)) if msg.contains("fr"));

        let mut settings = Settings::default();
        settings.dashboard.default_section = "autopay".to_string();
        assert_matches!(validate_settings(&settings), Err(AdminError::Config(_)));
    }

    #[test]
    fn test_rejects_shared_storage_keys() {
        let mut settings = Settings::default();
        settings.session.language_key = "token".to_string();
        assert_matches!(validate_settings(&settings), Err(AdminError::Config(_)));
    }
}
