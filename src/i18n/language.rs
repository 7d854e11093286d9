//! Operator languages and the persisted language preference

use std::fmt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::session::SessionStorage;
use crate::utils::errors::Result;

/// Languages the dashboard can be displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Uz,
    Ru,
    Kk,
    Ky,
    Tg,
    Zh,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Uz,
        Language::Ru,
        Language::Kk,
        Language::Ky,
        Language::Tg,
        Language::Zh,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Uz => "uz",
            Language::Ru => "ru",
            Language::Kk => "kk",
            Language::Ky => "ky",
            Language::Tg => "tg",
            Language::Zh => "zh",
        }
    }

    /// Name of the language in the language itself
    pub fn display_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Uz => "O'zbekcha",
            Language::Ru => "Русский",
            Language::Kk => "Қазақша",
            Language::Ky => "Кыргызча",
            Language::Tg => "Тоҷикӣ",
            Language::Zh => "中文",
        }
    }

    /// Parse a language code, accepting locales such as `ru-RU`
    pub fn from_code(code: &str) -> Option<Self> {
        let base = code.split(['-', '_']).next().unwrap_or(code).to_lowercase();
        Language::ALL.into_iter().find(|lang| lang.code() == base)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Language preference stored next to the session token
pub struct LanguagePreference;

impl LanguagePreference {
    /// Stored language, or `fallback` when nothing valid is stored
    pub fn load(storage: &SessionStorage, key: &str, fallback: Language) -> Language {
        match storage.get(key) {
            Some(code) => Language::from_code(&code).unwrap_or_else(|| {
                warn!(code = %code, "Stored language preference is unknown, using fallback");
                fallback
            }),
            None => fallback,
        }
    }

    pub fn save(storage: &SessionStorage, key: &str, language: Language) -> Result<()> {
        debug!(language = %language, "Saving language preference");
        storage.set(key, language.code())
    }
}
