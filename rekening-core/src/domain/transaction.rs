//! Recent transaction domain model

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::balance::{deserialize_number_like, deserialize_optional_number_like};

/// A transaction row from the recent transactions endpoint
///
/// Amounts are signed from the account holder's point of view: outgoing
/// transfers and withdrawals are negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTransaction {
    pub id: i64,
    /// Server-side type, e.g. "transfer", "deposit", "withdraw"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(deserialize_with = "deserialize_number_like")]
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    /// Naive server-local time
    pub timestamp: NaiveDateTime,
    #[serde(default, deserialize_with = "deserialize_optional_number_like")]
    pub balance_after: Option<Decimal>,
}

impl RecentTransaction {
    pub fn is_outgoing(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}
