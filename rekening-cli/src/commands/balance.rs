//! Balance command - fetch and show the current balance once

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use crate::output;
use rekening_core::domain::money::format_currency;
use rekening_core::LogEvent;

use super::{block_on, get_context, get_logger, log_command, log_event};

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let result = block_on(ctx.client.get_balance())?;
    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("balance_fetch_failed")
                    .with_command("balance")
                    .with_source("http")
                    .with_error(e.to_string()),
            );
            return Err(e).with_context(|| format!("Failed to fetch {}", ctx.client.balance_url()));
        }
    };

    log_command(&logger, "balance");

    let display = format_currency(snapshot.balance, &ctx.config.currency_label, ctx.config.locale);

    if json {
        return output::json(&json!({
            "balance": snapshot.balance,
            "display": display,
            "account_number": snapshot.account_number,
            "full_name": snapshot.full_name,
            "fetched_at": snapshot.fetched_at,
        }));
    }

    println!("{}", display.bold());
    if let Some(name) = &snapshot.full_name {
        println!("  Holder:  {}", name);
    }
    if let Some(number) = &snapshot.account_number {
        println!("  Account: {}", number);
    }

    Ok(())
}
