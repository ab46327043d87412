//! Currency input formatter
//!
//! Handles input and blur events of amount fields. While the user types the
//! field holds bare digits; on blur it is rewritten with thousands grouping.

use crate::domain::money::{group_digits, leading_integer, strip_non_digits, NumberLocale};
use crate::ports::{FieldRole, PageView};

/// Input/blur handlers for amount fields
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyInputFormatter {
    locale: NumberLocale,
}

impl CurrencyInputFormatter {
    pub fn new(locale: NumberLocale) -> Self {
        Self { locale }
    }

    /// Text after an input event: digits only, no separators
    pub fn on_input(&self, text: &str) -> String {
        strip_non_digits(text)
    }

    /// Text after a blur event: the leading integer, grouped, no fraction.
    ///
    /// Reading stops at the first non-digit, so a field that already holds
    /// separators keeps only its first group (`"1.234"` becomes `"1"`).
    /// Text without a leading integer, and negative zero, become `"0"`.
    pub fn on_blur(&self, text: &str) -> String {
        match leading_integer(text) {
            Some((negative, digits)) => {
                let grouped = group_digits(digits, self.locale);
                if negative && grouped != "0" {
                    format!("-{}", grouped)
                } else {
                    grouped
                }
            }
            None => "0".to_string(),
        }
    }

    /// Apply the input handler to an amount field on the page
    ///
    /// Returns the new text, or `None` when the field does not exist.
    pub fn handle_input(&self, view: &dyn PageView, index: usize) -> Option<String> {
        self.rewrite(view, index, |text| self.on_input(text))
    }

    /// Apply the blur handler to an amount field on the page
    pub fn handle_blur(&self, view: &dyn PageView, index: usize) -> Option<String> {
        self.rewrite(view, index, |text| self.on_blur(text))
    }

    fn rewrite(&self, view: &dyn PageView, index: usize, f: impl Fn(&str) -> String) -> Option<String> {
        let role = FieldRole::Amount(index);
        let current = view.text(role)?;
        let updated = f(&current);
        view.set_text(role, &updated).then_some(updated)
    }
}
