//! Validate command - check a transfer the way the transfer page does

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;

use crate::output;
use rekening_core::adapters::memory_view::MemoryView;
use rekening_core::domain::money::format_currency;
use rekening_core::ports::{FieldRole, PageView};
use rekening_core::services::{SubmitOutcome, TransferValidator};
use rekening_core::RekeningContext;

use super::{block_on, get_context, get_logger, log_command};

pub struct ValidateArgs {
    pub amount: String,
    pub recipient: String,
    pub balance_text: Option<String>,
    pub json: bool,
}

/// Balance display text: given on the command line, else rendered from the server
fn balance_display(ctx: &RekeningContext, given: Option<String>) -> Result<String> {
    if let Some(text) = given {
        return Ok(text);
    }
    let snapshot = block_on(ctx.client.get_balance())?.context("Failed to fetch balance")?;
    Ok(format_currency(snapshot.balance, &ctx.config.currency_label, ctx.config.locale))
}

pub fn run(args: ValidateArgs) -> Result<ExitCode> {
    let logger = get_logger();
    let ctx = get_context()?;

    let balance_text = balance_display(&ctx, args.balance_text)?;
    let view = Arc::new(MemoryView::transfer_page(&balance_text));
    view.set_text(FieldRole::Amount(0), &args.amount);
    view.set_text(FieldRole::RecipientAccount, &args.recipient);

    let validator = TransferValidator::new(ctx.config.page_config(None).transfer_rules);
    let outcome = validator.on_submit(view.as_ref());

    log_command(&logger, "validate");

    if args.json {
        output::json(&json!({
            "allowed": outcome.is_allowed(),
            "balance_text": balance_text,
            "message": outcome.message(),
            "rejection": match &outcome {
                SubmitOutcome::Block(rejection) => Some(rejection),
                SubmitOutcome::Allow => None,
            },
        }))?;
    } else {
        output::info(&format!("Displayed balance: {}", balance_text));
        for alert in view.alerts() {
            output::error(&alert);
        }
        if outcome.is_allowed() {
            output::success("Transfer allowed");
        }
    }

    Ok(if outcome.is_allowed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
