//! Withdrawal request model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WithdrawalStatus {
    Paid,
    Processing,
    Unpaid,
}

impl WithdrawalStatus {
    /// Allowed operator transitions; `Paid` is terminal
    pub fn can_transition_to(self, next: WithdrawalStatus) -> bool {
        use WithdrawalStatus::*;
        matches!(
            (self, next),
            (Unpaid, Processing) | (Unpaid, Paid) | (Processing, Paid) | (Processing, Unpaid)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_phone: String,
    pub card_number: String,
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    pub request_date: DateTime<Utc>,
}
