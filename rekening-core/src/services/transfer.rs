//! Transfer form validator - client-side submit gate

use tracing::debug;

use crate::domain::validation::{validate_transfer, TransferForm, TransferRejection, TransferRules};
use crate::ports::{FieldRole, PageView};

/// Decision for one submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Let the host post the form
    Allow,
    /// Cancel the submission; the alert has already been shown
    Block(TransferRejection),
}

impl SubmitOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, SubmitOutcome::Allow)
    }

    /// Alert text for a blocked submission
    pub fn message(&self) -> Option<String> {
        match self {
            SubmitOutcome::Allow => None,
            SubmitOutcome::Block(rejection) => Some(rejection.to_string()),
        }
    }
}

/// Validates the transfer form on submit
#[derive(Debug, Clone, Default)]
pub struct TransferValidator {
    rules: TransferRules,
}

impl TransferValidator {
    pub fn new(rules: TransferRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &TransferRules {
        &self.rules
    }

    /// Check raw field values without touching a page
    pub fn check(&self, form: &TransferForm<'_>) -> SubmitOutcome {
        match validate_transfer(form, &self.rules) {
            Ok(()) => SubmitOutcome::Allow,
            Err(rejection) => SubmitOutcome::Block(rejection),
        }
    }

    /// Handle a submit event
    ///
    /// Reads the first amount field, the recipient field and the balance
    /// display as they are right now. A block shows the alert synchronously.
    pub fn on_submit(&self, view: &dyn PageView) -> SubmitOutcome {
        let balance_text = view.text(FieldRole::BalanceDisplay);
        let amount_text = view.text(FieldRole::Amount(0)).unwrap_or_default();
        let recipient_text = view.text(FieldRole::RecipientAccount).unwrap_or_default();

        let outcome = self.check(&TransferForm {
            balance_text: balance_text.as_deref(),
            amount_text: &amount_text,
            recipient_text: &recipient_text,
        });

        if let SubmitOutcome::Block(rejection) = &outcome {
            debug!(reason = ?rejection, "Transfer submission blocked");
            view.alert(&rejection.to_string());
        }

        outcome
    }
}
