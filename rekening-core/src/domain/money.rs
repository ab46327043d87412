//! Locale-aware money text handling
//!
//! Pure functions over plain strings and numbers. Nothing here touches the
//! page; the formatter and poller services feed these with field text and
//! API values.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number formatting convention for a locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberLocale {
    /// Indonesian: `1.234.567,50`
    #[serde(rename = "id-ID")]
    IdId,
    /// US English: `1,234,567.50`
    #[serde(rename = "en-US")]
    EnUs,
}

impl NumberLocale {
    /// Thousands grouping separator
    pub fn group_separator(&self) -> char {
        match self {
            NumberLocale::IdId => '.',
            NumberLocale::EnUs => ',',
        }
    }

    /// Decimal separator
    pub fn decimal_separator(&self) -> char {
        match self {
            NumberLocale::IdId => ',',
            NumberLocale::EnUs => '.',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NumberLocale::IdId => "id-ID",
            NumberLocale::EnUs => "en-US",
        }
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale::IdId
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumberLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id-ID" | "id_ID" | "id" => Ok(NumberLocale::IdId),
            "en-US" | "en_US" | "en" => Ok(NumberLocale::EnUs),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

/// Keep only ASCII decimal digits, preserving their order
pub fn strip_non_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Leading integer of a piece of text as `(negative, digits)`.
///
/// Leading whitespace is skipped and one `+` or `-` sign is accepted.
/// Reading stops at the first non-digit, so `"1.234"` gives `"1"` and
/// `"12abc"` gives `"12"`. Returns `None` when no digit follows.
pub fn leading_integer(text: &str) -> Option<(bool, &str)> {
    let rest = text.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    (end > 0).then(|| (negative, &rest[..end]))
}

/// Insert group separators into a run of ASCII digits.
///
/// Leading zeros are dropped; an empty or all-zero run yields `"0"`.
/// Works on the text directly so arbitrarily long inputs stay exact.
pub fn group_digits(digits: &str, locale: NumberLocale) -> String {
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return "0".to_string();
    }

    let sep = locale.group_separator();
    let len = significant.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in significant.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// Format a whole number with grouping and no fraction digits
pub fn format_grouped_integer(value: u64, locale: NumberLocale) -> String {
    group_digits(&value.to_string(), locale)
}

/// Format with grouping and exactly two fraction digits.
///
/// Rounds half away from zero at the second fraction digit.
pub fn format_decimal_2dp(value: Decimal, locale: NumberLocale) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, locale));
    out.push(locale.decimal_separator());
    out.push_str(frac_part);
    out
}

/// Currency display text, e.g. `Rp 1.234.567,50`
pub fn format_currency(value: Decimal, label: &str, locale: NumberLocale) -> String {
    format!("{} {}", label, format_decimal_2dp(value, locale))
}

/// Parse a grouped integer back to a number by dropping every non-digit.
///
/// Returns `None` when there are no digits or the value overflows `u64`.
pub fn parse_grouped_integer(text: &str) -> Option<u64> {
    let digits = strip_non_digits(text);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
