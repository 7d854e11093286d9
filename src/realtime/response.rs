//! Operator replies to pending payments

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::utils::errors::{RealtimeError, RealtimeResult, Result, ValidationError};
use crate::utils::helpers::validate_card_number;

/// Validated `adminResponse` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminResponse {
    pub room: String,
    pub payment_id: String,
    /// Digits only
    pub card_number: String,
}

impl AdminResponse {
    /// Check required fields and normalize the card number to its 16 digits
    pub fn new(room: &str, payment_id: &str, card_number: &str) -> std::result::Result<Self, ValidationError> {
        let room = required(room, "room")?;
        let payment_id = required(payment_id, "paymentId")?;
        required(card_number, "cardNumber")?;
        let card_number = validate_card_number(card_number)?;

        Ok(Self {
            room,
            payment_id,
            card_number,
        })
    }
}

fn required(value: &str, field: &'static str) -> std::result::Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(value.to_string())
}

/// Server acknowledgment of an admin response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl AdminAck {
    /// Decode the argument list of a Socket.IO ack packet
    pub fn from_ack_args(args: &[Value]) -> RealtimeResult<Self> {
        let first = args
            .first()
            .ok_or_else(|| RealtimeError::Protocol("empty acknowledgment".to_string()))?;
        serde_json::from_value(first.clone())
            .map_err(|e| RealtimeError::Protocol(format!("bad acknowledgment: {}", e)))
    }
}

/// Anything able to deliver an admin response and wait for its ack
#[async_trait]
pub trait AdminResponder: Send + Sync {
    async fn respond(&self, response: AdminResponse) -> Result<AdminAck>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_valid_response_is_normalized() {
        let response = AdminResponse::new("room-42", "p-1", "1234 5678 9012 3456").unwrap();
        assert_eq!(response.card_number, "1234567890123456");
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"room": "room-42", "paymentId": "p-1", "cardNumber": "1234567890123456"})
        );
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(
            AdminResponse::new("", "p-1", "1234567890123456"),
            Err(ValidationError::MissingField("room"))
        );
        assert_eq!(
            AdminResponse::new("room-1", "  ", "1234567890123456"),
            Err(ValidationError::MissingField("paymentId"))
        );
        assert_eq!(
            AdminResponse::new("room-1", "p-1", ""),
            Err(ValidationError::MissingField("cardNumber"))
        );
    }

    #[test]
    fn test_card_number_rules() {
        assert_matches!(
            AdminResponse::new("room-1", "p-1", "1234-5678-9012-345"),
            Err(ValidationError::InvalidCardNumber { digits: 15 })
        );
        assert_matches!(
            AdminResponse::new("room-1", "p-1", "abcd123456789012"),
            Err(ValidationError::InvalidCardNumber { digits: 12 })
        );
    }

    #[test]
    fn test_ack_decoding() {
        let ack = AdminAck::from_ack_args(&[json!({"success": true, "message": "sent"})]).unwrap();
        assert!(ack.success);
        assert_eq!(ack.message.as_deref(), Some("sent"));
        assert_matches!(AdminAck::from_ack_args(&[]), Err(RealtimeError::Protocol(_)));
    }
}
