//! Transactions command - list recent account activity

use anyhow::{Context, Result};
use colored::Colorize;

use crate::output;
use rekening_core::domain::money::format_currency;

use super::{block_on, get_context, get_logger, log_command};

pub fn run(json: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let transactions = block_on(ctx.client.recent_transactions())?
        .context("Failed to fetch recent transactions")?;

    log_command(&logger, "transactions");

    if json {
        return output::json(&transactions);
    }

    if transactions.is_empty() {
        println!("No recent transactions.");
        return Ok(());
    }

    let label = &ctx.config.currency_label;
    let locale = ctx.config.locale;

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Type", "Description", "Amount", "Balance After"]);

    for tx in &transactions {
        let amount = format_currency(tx.amount, label, locale);
        let amount = if tx.is_outgoing() {
            amount.red().to_string()
        } else {
            amount.green().to_string()
        };

        table.add_row(vec![
            tx.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            tx.kind.clone(),
            tx.description.clone().unwrap_or_default(),
            amount,
            tx.balance_after
                .map(|b| format_currency(b, label, locale))
                .unwrap_or_default(),
        ]);
    }

    println!("{}", table);
    Ok(())
}
