//! Payment model
//!
//! Payments arrive both from `GET /payments` and from realtime `newPayment`
//! snapshots. The backend is inconsistent about casing of the status, so the
//! enum accepts both spellings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "PENDING", alias = "Pending")]
    Pending,
    #[serde(rename = "SENDING", alias = "Sending")]
    Sending,
    #[serde(rename = "COMPLETED", alias = "Completed")]
    Completed,
    #[serde(rename = "CANCELLED", alias = "Cancelled", alias = "Failed")]
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Backend document ids (`_id`, `id`) are ignored
    pub payment_id: String,
    pub user_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "howMuch", default)]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
    pub status: PaymentStatus,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Deposit / Subscription / Commission on the history screen
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub user_phone: Option<String>,
}

impl Payment {
    /// Realtime room the admin response for this payment is sent to
    pub fn room(&self) -> String {
        format!("room-{}", self.user_id)
    }
}
