//! Per-language catalog text shared by tariffs and products

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub language: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub long_description: String,
    /// Delimited feature list as stored by the backend
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub usage: String,
}

impl Translation {
    /// Empty entry for a language, as shown in a fresh form
    pub fn blank(language: &str) -> Self {
        Self {
            language: language.to_string(),
            ..Default::default()
        }
    }

    /// Features split on commas and newlines, trimmed, blanks dropped
    pub fn feature_list(&self) -> Vec<&str> {
        self.features
            .split([',', '\n'])
            .map(str::trim)
            .filter(|feature| !feature.is_empty())
            .collect()
    }
}

/// Pick the translation for `language`, falling back to the first one
pub fn pick<'a>(translations: &'a [Translation], language: &str) -> Option<&'a Translation> {
    translations
        .iter()
        .find(|t| t.language == language)
        .or_else(|| translations.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_list_splitting() {
        let translation = Translation {
            features: "Daily profit, Referral bonus\n\n 24/7 support ,".to_string(),
            ..Translation::blank("en")
        };
        assert_eq!(
            translation.feature_list(),
            vec!["Daily profit", "Referral bonus", "24/7 support"]
        );
        assert!(Translation::blank("uz").feature_list().is_empty());
    }

    #[test]
    fn test_pick_falls_back_to_first() {
        let translations = vec![Translation::blank("uz"), Translation::blank("ru")];
        assert_eq!(pick(&translations, "ru").map(|t| t.language.as_str()), Some("ru"));
        assert_eq!(pick(&translations, "zh").map(|t| t.language.as_str()), Some("uz"));
        assert!(pick(&[], "en").is_none());
    }
}
