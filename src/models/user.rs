//! User model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: String,
    /// Coin balance
    #[serde(default, rename = "coin")]
    pub balance: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub subscription_plan: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the account is blocked
    pub fn is_blocked(&self) -> bool {
        !self.is_active
    }
}

/// Status filter values on the users screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Blocked,
}

impl UserStatus {
    pub fn of(user: &User) -> Self {
        if user.is_active {
            UserStatus::Active
        } else {
            UserStatus::Blocked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_backend_user_deserialization() {
        let json = r#"{"_id": "u1", "email": "a@b.uz", "role": "USER", "coin": 12.5, "isActive": false, "createdAt": "2024-05-01T10:00:00Z"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.balance, dec!(12.5));
        assert!(user.is_blocked());
        assert_eq!(UserStatus::of(&user), UserStatus::Blocked);
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_defaults_for_sparse_payload() {
        let user: User = serde_json::from_str(r#"{"_id": "u2"}"#).unwrap();
        assert!(user.is_active);
        assert_eq!(user.balance, Decimal::ZERO);
        assert_eq!(user.email, "");
    }

    #[test]
    fn test_extra_id_keys_are_ignored() {
        let json = r#"{"_id": "u1", "id": "u1", "coin": 3, "balance": 99, "accountBalance": 99, "phone": "+1", "phoneNumber": "+998901234567"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.balance, dec!(3));
        assert_eq!(user.phone_number.as_deref(), Some("+998901234567"));
    }

    #[test]
    fn test_balance_serializes_as_coin() {
        let user: User = serde_json::from_str(r#"{"_id": "u3", "coin": 4.5}"#).unwrap();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["_id"], "u3");
        assert!(value.get("coin").is_some());
        assert!(value.get("balance").is_none());
    }
}
