//! Tariff model

use serde::{Deserialize, Serialize};
use super::translation::Translation;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tariff {
    #[serde(rename = "_id")]
    pub id: String,
    /// Term in days
    #[serde(default)]
    pub term: Option<u32>,
    #[serde(default)]
    pub coin: f64,
    #[serde(default)]
    pub daily_profit: f64,
    #[serde(default, rename = "referral_bonus")]
    pub referral_bonus: f64,
    #[serde(default, rename = "photo_url")]
    pub photo_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

/// Body of `POST /tariff/add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffDraft {
    pub term: Option<u32>,
    pub coin: f64,
    pub daily_profit: f64,
    #[serde(rename = "referral_bonus")]
    pub referral_bonus: f64,
    #[serde(rename = "photo_url", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub translations: Vec<Translation>,
}

impl Default for TariffDraft {
    fn default() -> Self {
        Self {
            term: Some(30),
            coin: 0.0,
            daily_profit: 0.0,
            referral_bonus: 0.0,
            photo_url: None,
            is_active: true,
            translations: vec![Translation::blank("en")],
        }
    }
}

/// Body of `PATCH /tariff/:id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TariffActivation {
    pub is_active: bool,
}
