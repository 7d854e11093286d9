//! Error handling for the admin dashboard
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the admin dashboard
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Realtime error: {0}")]
    Realtime(#[from] RealtimeError),

    #[error("Session changed while the request was in flight")]
    SessionInvalidated,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Client-side validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field is required: {0}")]
    MissingField(&'static str),

    #[error("Card number must contain exactly 16 digits, got {digits}")]
    InvalidCardNumber { digits: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Realtime relay specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RealtimeError {
    #[error("Realtime relay is not connected")]
    NotConnected,

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Connection rejected by server: {0}")]
    ConnectRejected(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Acknowledgment timed out")]
    AckTimeout,

    #[error("Realtime relay closed")]
    Closed,

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, AdminError>;

/// Result type alias for realtime operations
pub type RealtimeResult<T> = std::result::Result<T, RealtimeError>;

impl AdminError {
    /// Whether the operator has to log in again after this error
    pub fn requires_login(&self) -> bool {
        matches!(self, AdminError::Auth(_) | AdminError::SessionInvalidated)
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            AdminError::Network(_) => true,
            AdminError::Auth(_) => false,
            AdminError::Server { status, .. } => *status >= 500,
            AdminError::Validation(_) => true,
            AdminError::Realtime(RealtimeError::ConnectRejected(_)) => false,
            AdminError::Realtime(_) => true,
            AdminError::SessionInvalidated => false,
            AdminError::Config(_) => false,
            AdminError::Http(_) => true,
            AdminError::Serialization(_) => false,
            AdminError::Io(_) => true,
            AdminError::UrlParse(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AdminError::Config(_) => ErrorSeverity::Critical,
            AdminError::Auth(_) | AdminError::SessionInvalidated => ErrorSeverity::Warning,
            AdminError::Validation(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
