//! In-memory page view
//!
//! Holds element texts in memory. Used by the CLI to drive a page session
//! from the terminal and by tests to observe what the components wrote.

use std::sync::Mutex;

use crate::ports::{FieldRole, PageView};

#[derive(Debug, Default)]
struct ViewState {
    amounts: Vec<String>,
    recipient: Option<String>,
    balance: Option<String>,
    transfer_form: bool,
    alerts: Vec<String>,
}

/// Page view backed by plain strings
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<ViewState>,
}

impl MemoryView {
    /// An empty page: no amount inputs, no form, no balance display
    pub fn new() -> Self {
        Self::default()
    }

    /// A dashboard page with only a balance display
    pub fn dashboard(balance_text: &str) -> Self {
        Self::new().with_balance_display(balance_text)
    }

    /// A transfer page: balance display, one amount input and the recipient input
    pub fn transfer_page(balance_text: &str) -> Self {
        Self::new()
            .with_balance_display(balance_text)
            .with_amount_fields(1)
            .with_transfer_form()
    }

    pub fn with_amount_fields(mut self, count: usize) -> Self {
        self.state_mut().amounts = vec![String::new(); count];
        self
    }

    pub fn with_balance_display(mut self, text: &str) -> Self {
        self.state_mut().balance = Some(text.to_string());
        self
    }

    /// Adds the transfer form together with its recipient input
    pub fn with_transfer_form(mut self) -> Self {
        let state = self.state_mut();
        state.transfer_form = true;
        state.recipient.get_or_insert_with(String::new);
        self
    }

    fn state_mut(&mut self) -> &mut ViewState {
        self.state.get_mut().unwrap_or_else(|e| e.into_inner())
    }

    /// Messages shown through [`PageView::alert`], oldest first
    pub fn alerts(&self) -> Vec<String> {
        self.state.lock().map(|s| s.alerts.clone()).unwrap_or_default()
    }
}

impl PageView for MemoryView {
    fn amount_field_count(&self) -> usize {
        self.state.lock().map(|s| s.amounts.len()).unwrap_or(0)
    }

    fn text(&self, role: FieldRole) -> Option<String> {
        let state = self.state.lock().ok()?;
        match role {
            FieldRole::Amount(i) => state.amounts.get(i).cloned(),
            FieldRole::RecipientAccount => state.recipient.clone(),
            FieldRole::BalanceDisplay => state.balance.clone(),
        }
    }

    fn set_text(&self, role: FieldRole, text: &str) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        let slot = match role {
            FieldRole::Amount(i) => state.amounts.get_mut(i),
            FieldRole::RecipientAccount => state.recipient.as_mut(),
            FieldRole::BalanceDisplay => state.balance.as_mut(),
        };
        match slot {
            Some(value) => {
                *value = text.to_string();
                true
            }
            None => false,
        }
    }

    fn has_transfer_form(&self) -> bool {
        self.state.lock().map(|s| s.transfer_form).unwrap_or(false)
    }

    fn alert(&self, message: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.alerts.push(message.to_string());
        }
    }
}
