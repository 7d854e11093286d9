//! Product model

use serde::{Deserialize, Serialize};
use super::translation::Translation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUrl {
    pub photo_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub rating: f64,
    /// Review count; the backend spells the field `rewiev`
    #[serde(default, rename = "rewiev")]
    pub reviews: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub coin: f64,
    #[serde(default)]
    pub translations: Vec<Translation>,
    #[serde(default)]
    pub photo_url: Vec<PhotoUrl>,
}

impl Product {
    pub fn primary_photo(&self) -> Option<&str> {
        self.photo_url.first().map(|p| p.photo_url.as_str())
    }

    /// Editable copy of this product
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            rating: self.rating,
            reviews: self.reviews,
            count: self.count,
            coin: self.coin,
            translations: self.translations.clone(),
            photo_url: self.photo_url.clone(),
        }
    }
}

/// Body of `POST /products` and `PUT /products/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub rating: f64,
    #[serde(rename = "rewiev")]
    pub reviews: u32,
    pub count: u32,
    pub coin: f64,
    pub translations: Vec<Translation>,
    pub photo_url: Vec<PhotoUrl>,
}

impl ProductDraft {
    /// Replace the photo list with a single uploaded URL
    pub fn with_photo(mut self, url: Option<String>) -> Self {
        self.photo_url = url
            .filter(|u| !u.is_empty())
            .map(|photo_url| vec![PhotoUrl { photo_url }])
            .unwrap_or_default();
        self
    }

    pub fn primary_photo(&self) -> Option<&str> {
        self.photo_url.first().map(|p| p.photo_url.as_str())
    }
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self {
            rating: 5.0,
            reviews: 100,
            count: 10,
            coin: 1.0,
            translations: vec![Translation::blank("en")],
            photo_url: Vec::new(),
        }
    }
}
