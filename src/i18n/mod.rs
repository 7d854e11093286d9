//! Internationalization module
//!
//! This module handles multi-language support for the admin dashboard.
//! It provides translation loading, key lookup with fallback, and the
//! persisted operator language preference.

pub mod language;
pub mod loader;

// Re-export commonly used i18n components
pub use language::{Language, LanguagePreference};
pub use loader::{I18n, TranslationParams};
