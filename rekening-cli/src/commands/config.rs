//! Config command - show or change the configuration

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use crate::output;
use rekening_core::config::{Config, SETTINGS_FILE};

use super::get_rekening_dir;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Change one setting in settings.json
    Set {
        /// Setting name, e.g. minTransfer or baseUrl
        key: String,
        /// New value; JSON literals such as 5000, true or null are accepted
        value: String,
    },
}

fn or_unset<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map_or_else(|| "(unset)".to_string(), ToString::to_string)
}

pub fn run(command: Option<ConfigCommands>, json: bool) -> Result<()> {
    match command {
        Some(ConfigCommands::Set { key, value }) => set(&key, &value, json),
        None => show(json),
    }
}

fn set(key: &str, value: &str, json: bool) -> Result<()> {
    let rekening_dir = get_rekening_dir()?;
    std::fs::create_dir_all(&rekening_dir)?;

    // Environment overrides stay out of the saved file
    let mut config = Config::load_file(&rekening_dir)?;
    config.set(key, value)?;
    config.save(&rekening_dir)?;

    if json {
        return output::json(&config);
    }
    output::success(&format!("Set {} in {}", key, rekening_dir.join(SETTINGS_FILE).display()));
    Ok(())
}

fn show(json: bool) -> Result<()> {
    let rekening_dir = get_rekening_dir()?;
    let config = Config::load(&rekening_dir)?;

    if json {
        return output::json(&config);
    }

    println!("{}", "Rekening Configuration".bold());
    println!("  Settings: {}", rekening_dir.join(SETTINGS_FILE).display());
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["baseUrl".to_string(), config.base_url.clone()]);
    table.add_row(vec!["balancePath".to_string(), config.balance_path.clone()]);
    table.add_row(vec![
        "recentTransactionsPath".to_string(),
        config.recent_transactions_path.clone(),
    ]);
    table.add_row(vec!["pollIntervalSecs".to_string(), config.poll_interval_secs.to_string()]);
    table.add_row(vec!["dashboardRoute".to_string(), config.dashboard_route.clone()]);
    table.add_row(vec!["pollingEnabled".to_string(), or_unset(&config.polling_enabled)]);
    table.add_row(vec!["locale".to_string(), config.locale.to_string()]);
    table.add_row(vec!["currencyLabel".to_string(), config.currency_label.clone()]);
    table.add_row(vec!["minTransfer".to_string(), config.min_transfer.to_string()]);
    table.add_row(vec![
        "accountNumberDigits".to_string(),
        config.account_number_digits.to_string(),
    ]);
    table.add_row(vec!["requestTimeoutSecs".to_string(), or_unset(&config.request_timeout_secs)]);
    table.add_row(vec![
        "sessionCookie".to_string(),
        // never echo the cookie itself
        config.session_cookie.as_ref().map_or("(unset)", |_| "(set)").to_string(),
    ]);

    println!("{}", table);
    Ok(())
}
