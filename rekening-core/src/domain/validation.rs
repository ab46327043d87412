//! Transfer form rules
//!
//! The checks here are advisory: the server re-validates every transfer.
//! The balance figure comes from whatever the page currently displays, so it
//! can be stale or edited by the user.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::strip_non_digits;

/// Minimum transfer amount in whole rupiah
pub const DEFAULT_MIN_TRANSFER: u64 = 1000;

/// Length of a recipient account number
pub const DEFAULT_ACCOUNT_DIGITS: usize = 16;

/// Why a transfer submission was blocked
///
/// The display text is the alert shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TransferRejection {
    #[error("Minimum transfer adalah Rp 1,000")]
    BelowMinimum { amount: u64, minimum: u64 },

    #[error("Saldo tidak mencukupi")]
    InsufficientBalance { amount: u64, balance: f64 },

    #[error("Nomor rekening harus 16 digit")]
    InvalidRecipient { recipient: String },
}

/// Limits applied by the transfer validator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRules {
    pub min_amount: u64,
    pub account_digits: usize,
}

impl Default for TransferRules {
    fn default() -> Self {
        Self {
            min_amount: DEFAULT_MIN_TRANSFER,
            account_digits: DEFAULT_ACCOUNT_DIGITS,
        }
    }
}

/// Raw field values captured at submit time
#[derive(Debug, Clone, Default)]
pub struct TransferForm<'a> {
    /// Balance display text, `None` when the page has no balance element
    pub balance_text: Option<&'a str>,
    pub amount_text: &'a str,
    pub recipient_text: &'a str,
}

/// Read the displayed balance: every non-digit is dropped, then the rest is
/// read as a number. Absent or empty text reads as zero.
pub fn parse_displayed_balance(text: Option<&str>) -> f64 {
    text.map(strip_non_digits)
        .filter(|d| !d.is_empty())
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Read the amount field as a whole number, ignoring non-digits.
///
/// No digits reads as zero. Values beyond `u64::MAX` saturate.
pub fn parse_amount(text: &str) -> u64 {
    let digits = strip_non_digits(text);
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

fn default_account_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // \d in the regex crate is Unicode-aware, account numbers are ASCII only
    PATTERN.get_or_init(|| Regex::new("^[0-9]{16}$").unwrap())
}

/// Check a recipient account number after trimming surrounding whitespace
pub fn is_valid_account_number(recipient: &str, digits: usize) -> bool {
    let trimmed = recipient.trim();
    if digits == DEFAULT_ACCOUNT_DIGITS {
        return default_account_pattern().is_match(trimmed);
    }
    Regex::new(&format!("^[0-9]{{{}}}$", digits))
        .map(|re| re.is_match(trimmed))
        .unwrap_or(false)
}

/// Validate a transfer submission.
///
/// Checks run in order and stop at the first failure: minimum amount,
/// available balance, then recipient account format.
pub fn validate_transfer(form: &TransferForm<'_>, rules: &TransferRules) -> Result<(), TransferRejection> {
    let balance = parse_displayed_balance(form.balance_text);
    let amount = parse_amount(form.amount_text);

    if amount < rules.min_amount {
        return Err(TransferRejection::BelowMinimum {
            amount,
            minimum: rules.min_amount,
        });
    }

    if amount as f64 > balance {
        return Err(TransferRejection::InsufficientBalance { amount, balance });
    }

    if !is_valid_account_number(form.recipient_text, rules.account_digits) {
        return Err(TransferRejection::InvalidRecipient {
            recipient: form.recipient_text.trim().to_string(),
        });
    }

    Ok(())
}
