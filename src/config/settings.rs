//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::Path;
use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub realtime: RealtimeConfig,
    pub session: SessionConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
}

/// Backend HTTP API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Case-insensitive fragments of backend messages that mean the token was rejected
    pub auth_error_markers: Vec<String>,
}

/// Realtime relay configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RealtimeConfig {
    /// Socket host; the API base URL is used when unset
    pub url: Option<String>,
    pub path: String,
    pub ack_timeout_seconds: u64,
    pub reconnect: ReconnectConfig,
}

/// Reconnect backoff configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReconnectConfig {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub jitter: f64,
    pub max_retries: u32,
}

/// Persistent session storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub storage_path: String,
    pub token_key: String,
    pub language_key: String,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub translations_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; stdout only when unset
    pub file_path: Option<String>,
    pub json: bool,
}

/// Dashboard shell configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardConfig {
    pub default_section: String,
}

impl Settings {
    /// Load settings from defaults, `config.toml` and `MLM_ADMIN__*` environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(config::File::with_name("config").required(false))
    }

    /// Load settings with an explicit configuration file layered over the defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::load(config::File::from(path.as_ref()).required(true))
    }

    fn load<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("MLM_ADMIN")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("i18n.supported_languages")
                    .with_list_parse_key("api.auth_error_markers")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::AdminError> {
        super::validation::validate_settings(self)
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl RealtimeConfig {
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_secs(self.ack_timeout_seconds)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://mlm-backend.pixl.uz".to_string(),
                timeout_seconds: 15,
                user_agent: "MlmAdmin/1.0".to_string(),
                auth_error_markers: vec![
                    "unauthorized".to_string(),
                    "jwt expired".to_string(),
                    "jwt malformed".to_string(),
                    "invalid token".to_string(),
                    "token not provided".to_string(),
                ],
            },
            realtime: RealtimeConfig {
                url: None,
                path: "/socket.io/".to_string(),
                ack_timeout_seconds: 10,
                reconnect: ReconnectConfig {
                    initial_delay_ms: 500,
                    max_delay_ms: 30_000,
                    multiplier: 2.0,
                    jitter: 0.2,
                    max_retries: 10,
                },
            },
            session: SessionConfig {
                storage_path: ".mlm-admin/storage.json".to_string(),
                token_key: "token".to_string(),
                language_key: "admin-panel-language".to_string(),
            },
            i18n: I18nConfig {
                default_language: "en".to_string(),
                supported_languages: ["en", "uz", "ru", "kk", "ky", "tg", "zh"]
                    .iter()
                    .map(|code| code.to_string())
                    .collect(),
                translations_dir: "translations".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                json: false,
            },
            dashboard: DashboardConfig {
                default_section: "users".to_string(),
            },
        }
    }
}
