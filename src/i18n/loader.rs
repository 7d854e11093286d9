//! Translation loader and i18n management
//!
//! This module provides the core internationalization functionality including
//! translation loading, key lookup with fallback, and message formatting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, error, info, warn};
use crate::config::I18nConfig;
use crate::utils::errors::{AdminError, Result};
use super::language::Language;

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Loaded translations by language
    translations: HashMap<Language, Map<String, Value>>,
    default_language: Language,
    supported_languages: Vec<Language>,
    translations_dir: PathBuf,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

impl I18n {
    /// Create a new I18n instance; unknown codes in the config are skipped
    pub fn new(config: &I18nConfig) -> Self {
        let supported_languages = config
            .supported_languages
            .iter()
            .filter_map(|code| Language::from_code(code))
            .collect();

        Self {
            translations: HashMap::new(),
            default_language: Language::from_code(&config.default_language).unwrap_or_default(),
            supported_languages,
            translations_dir: PathBuf::from(&config.translations_dir),
        }
    }

    /// Load all translation files from the translations directory
    pub async fn load_translations(&mut self) -> Result<()> {
        let translations_dir = self.translations_dir.clone();

        for lang in self.supported_languages.clone() {
            let file_path = translations_dir.join(format!("{}.json", lang.code()));

            if file_path.exists() {
                match self.load_language_file(&file_path, lang).await {
                    Ok(_) => info!("Loaded translations for language: {}", lang),
                    Err(e) => {
                        error!("Failed to load translations for {}: {}", lang, e);
                        if lang == self.default_language {
                            return Err(AdminError::Config(
                                format!("Failed to load default language translations: {}", e)
                            ));
                        }
                    }
                }
            } else if lang == self.default_language {
                return Err(AdminError::Config(
                    format!("Default language translation file not found: {}", file_path.display())
                ));
            } else {
                debug!("Translation file not found: {}", file_path.display());
            }
        }

        Ok(())
    }

    /// Load a single language file
    async fn load_language_file(&mut self, file_path: &Path, lang: Language) -> Result<()> {
        let content = fs::read_to_string(file_path).await?;
        let translations: Value = serde_json::from_str(&content)?;

        self.insert_translations(lang, translations)
    }

    /// Register a translation table directly
    pub fn insert_translations(&mut self, lang: Language, table: Value) -> Result<()> {
        match table {
            Value::Object(map) => {
                debug!("Loaded {} translation keys for {}", map.len(), lang);
                self.translations.insert(lang, map);
                Ok(())
            }
            _ => Err(AdminError::Config(
                format!("Invalid translation file format for {}", lang)
            )),
        }
    }

    /// Get a translated message, falling back to the default language and then to the key
    pub fn t(&self, key: &str, lang: Language) -> String {
        self.t_with(key, lang, None)
    }

    /// Get a translated message with `{name}` placeholders substituted
    pub fn t_with(&self, key: &str, lang: Language, params: Option<&TranslationParams>) -> String {
        let text = self
            .lookup(key, lang)
            .or_else(|| {
                if lang != self.default_language {
                    self.lookup(key, self.default_language)
                } else {
                    None
                }
            });

        match text {
            Some(text) => format_message(&text, params),
            None => {
                warn!("Translation key '{}' not found in any language", key);
                key.to_string()
            }
        }
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, lang: Language) -> bool {
        self.supported_languages.contains(&lang)
    }

    /// Get supported languages
    pub fn supported_languages(&self) -> &[Language] {
        &self.supported_languages
    }

    /// Get default language
    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Resolve a dot-separated key such as `sections.users`
    fn lookup(&self, key: &str, lang: Language) -> Option<String> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut current = self.translations.get(&lang)?.get(first)?;

        for part in parts {
            current = current.get(part)?;
        }

        match current {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// Format message with parameters
fn format_message(template: &str, params: Option<&TranslationParams>) -> String {
    match params {
        Some(params) => params.iter().fold(template.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{}}}", key), value)
        }),
        None => template.to_string(),
    }
}
