//! MLM Admin
//!
//! Operator dashboard core for the MLM platform. This library provides the
//! session store, a typed client for the backend REST API, the realtime
//! payment relay, one controller per dashboard screen and the shell that
//! ties them together with multi-language support.

pub mod config;
pub mod services;
pub mod models;
pub mod session;
pub mod realtime;
pub mod screens;
pub mod shell;
pub mod i18n;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AdminError, Result};

// Re-export main components for easy access
pub use services::ServiceFactory;
pub use session::{Session, SessionStorage};
pub use realtime::RealtimeRelay;
pub use shell::{Section, Shell, ShellView};
pub use i18n::I18n;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
