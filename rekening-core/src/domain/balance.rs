//! Balance snapshot domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Balance as reported by the server at one point in time
///
/// Nothing is cached: each poll produces a fresh snapshot that overwrites
/// whatever the page displayed before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub balance: Decimal,
    pub account_number: Option<String>,
    pub full_name: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl BalanceSnapshot {
    /// Create a snapshot with only a balance
    pub fn new(balance: Decimal) -> Self {
        Self {
            balance,
            account_number: None,
            full_name: None,
            fetched_at: Utc::now(),
        }
    }

    /// Attach the account holder details returned alongside the balance
    pub fn with_holder(mut self, account_number: Option<String>, full_name: Option<String>) -> Self {
        self.account_number = account_number;
        self.full_name = full_name;
        self
    }
}

/// Convert a JSON number or numeric string to a decimal
///
/// Values outside the `Decimal` range (about 7.9e28) give `None`.
pub fn decimal_from_json(value: &JsonValue) -> Option<Decimal> {
    match value {
        JsonValue::Number(n) => {
            let s = n.to_string();
            s.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(&s).ok())
        }
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(s).ok())
        }
        _ => None,
    }
}

/// Deserialize an amount that can be a number or a numeric string
pub(crate) fn deserialize_number_like<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: JsonValue = Deserialize::deserialize(deserializer)?;
    decimal_from_json(&value)
        .ok_or_else(|| D::Error::custom(format!("expected number or numeric string, got {}", value)))
}

/// Optional variant of [`deserialize_number_like`]; `null` reads as `None`
pub(crate) fn deserialize_optional_number_like<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => decimal_from_json(&v)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected number or numeric string, got {}", v))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_from_json_number() {
        assert_eq!(decimal_from_json(&json!(1234567.5)), Some(Decimal::new(12345675, 1)));
        assert_eq!(decimal_from_json(&json!(10000000)), Some(Decimal::new(10_000_000, 0)));
    }

    #[test]
    fn test_decimal_from_json_string() {
        assert_eq!(decimal_from_json(&json!(" 250.75 ")), Some(Decimal::new(25075, 2)));
        assert_eq!(decimal_from_json(&json!("1e3")), Some(Decimal::new(1000, 0)));
        assert_eq!(decimal_from_json(&json!("abc")), None);
    }

    #[test]
    fn test_decimal_from_json_rejects_other_types() {
        assert_eq!(decimal_from_json(&json!(null)), None);
        assert_eq!(decimal_from_json(&json!(true)), None);
        assert_eq!(decimal_from_json(&json!({"amount": 1})), None);
    }

    #[test]
    fn test_decimal_from_json_out_of_range() {
        assert_eq!(decimal_from_json(&json!(1e30)), None);
        assert_eq!(decimal_from_json(&json!("1e30")), None);
        assert!(decimal_from_json(&json!(1e27)).is_some());
    }

    #[test]
    fn test_snapshot_with_holder() {
        let snapshot = BalanceSnapshot::new(Decimal::new(500, 0))
            .with_holder(Some("0000000000000001".to_string()), Some("Admin Bank".to_string()));
        assert_eq!(snapshot.account_number.as_deref(), Some("0000000000000001"));
        assert_eq!(snapshot.full_name.as_deref(), Some("Admin Bank"));
    }
}
