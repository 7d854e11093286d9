//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;
use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;
use crate::utils::errors::ValidationError;

/// Number of digits a settlement card number must carry
pub const CARD_NUMBER_DIGITS: usize = 16;

fn non_digit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^0-9]").expect("static pattern is valid"))
}

fn card_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{16}$").expect("static pattern is valid"))
}

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Strip every character outside ASCII `0-9`
pub fn digits_only(input: &str) -> String {
    non_digit_pattern().replace_all(input, "").into_owned()
}

/// Validate a card number: exactly 16 digits must remain after stripping non-digits
pub fn validate_card_number(input: &str) -> Result<String, ValidationError> {
    let digits = digits_only(input);
    if card_number_pattern().is_match(&digits) {
        Ok(digits)
    } else {
        Err(ValidationError::InvalidCardNumber { digits: digits.chars().count() })
    }
}

/// Mask a card number for logs, keeping only the last four digits
pub fn mask_card_number(input: &str) -> String {
    let digits = digits_only(input);
    let hidden = digits.chars().count().saturating_sub(4);
    let tail: String = digits.chars().skip(hidden).collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

/// Case-insensitive substring match used by every list filter
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Format a timestamp for display
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_card_number_examples() {
        assert_eq!(
            validate_card_number("1234 5678 9012 3456"),
            Ok("1234567890123456".to_string())
        );
        assert_eq!(
            validate_card_number("1234-5678-9012-345"),
            Err(ValidationError::InvalidCardNumber { digits: 15 })
        );
        assert_eq!(
            validate_card_number("abcd123456789012"),
            Err(ValidationError::InvalidCardNumber { digits: 12 })
        );
        assert_eq!(
            validate_card_number(""),
            Err(ValidationError::InvalidCardNumber { digits: 0 })
        );
    }

    #[test]
    fn test_card_number_ignores_non_ascii_digits() {
        assert_eq!(
            validate_card_number("1234567890123456\u{0967}"),
            Ok("1234567890123456".to_string())
        );
        assert_eq!(
            validate_card_number("\u{FF11}234 5678 9012 3456"),
            Err(ValidationError::InvalidCardNumber { digits: 15 })
        );
        assert_eq!(digits_only("٤٢ 42"), "42");
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(mask_card_number("8600 1234 5678 9012"), "************9012");
        assert_eq!(mask_card_number("12"), "12");
        assert_eq!(mask_card_number("8600 1234 5678 9012 \u{0661}\u{0662}"), "************9012");
        assert_eq!(mask_card_number("\u{0967}\u{0968}\u{0969}"), "");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Admin@Example.com", "admin"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("+998 90 123", "777"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("a much longer message", 10), "a much ...");
    }

    proptest! {
        #[test]
        fn card_number_accepted_iff_sixteen_digits(input in "[0-9 a-z\\-\u{0660}-\u{0669}\u{0966}-\u{096F}\u{FF10}-\u{FF19}]{0,40}") {
            let digit_count = input.chars().filter(|c| c.is_ascii_digit()).count();
            prop_assert_eq!(validate_card_number(&input).is_ok(), digit_count == CARD_NUMBER_DIGITS);
        }

        #[test]
        fn masked_card_keeps_only_ascii_digits(input in "[0-9 \u{0660}-\u{0669}\u{FF10}-\u{FF19}]{0,40}") {
            let masked = mask_card_number(&input);
            let digit_count = input.chars().filter(|c| c.is_ascii_digit()).count();
            prop_assert_eq!(masked.chars().count(), digit_count);
            prop_assert!(masked.chars().all(|c| c == '*' || c.is_ascii_digit()));
        }
    }
}
