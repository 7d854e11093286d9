//! Coin balance model

use serde::{Deserialize, Serialize};

/// One coin balance entry, keyed by currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub currency: String,
    pub count: i64,
}

impl Coin {
    /// Path key: backend id when present, currency otherwise
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.currency)
    }
}

/// Body of `POST /coin` and `PUT /coin/:id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinDraft {
    pub currency: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_falls_back_to_currency() {
        let with_id: Coin = serde_json::from_str(r#"{"_id": "c1", "currency": "USD", "count": 3}"#).unwrap();
        assert_eq!(with_id.key(), "c1");
        let without_id: Coin = serde_json::from_str(r#"{"currency": "UZS", "count": 9}"#).unwrap();
        assert_eq!(without_id.key(), "UZS");
        let both: Coin =
            serde_json::from_str(r#"{"_id": "c2", "id": "c2", "currency": "EUR", "count": 1}"#).unwrap();
        assert_eq!(both.key(), "c2");
    }
}
