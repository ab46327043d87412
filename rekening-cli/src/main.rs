//! Rekening CLI - drive the banking page logic from a terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{balance, config, format, logs, transactions, validate, watch};

/// Rekening - balance, transfers and amount formatting for the bank web app
#[derive(Parser)]
#[command(name = "rek", version, about, long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how an amount field rewrites typed text
    Format {
        /// Text as typed into the amount field
        text: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a transfer against the client-side rules
    Validate {
        /// Amount field text
        #[arg(long)]
        amount: String,
        /// Recipient account number
        #[arg(long)]
        recipient: String,
        /// Balance display text (fetched from the server when omitted)
        #[arg(long)]
        balance_text: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch the current balance
    Balance {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent transactions
    Transactions {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Poll the balance like the dashboard page does
    Watch {
        /// Page route to mount (defaults to the dashboard route)
        #[arg(long)]
        route: Option<String>,
        /// Seconds between refreshes
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<usize>,
    },

    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
        /// Output as JSON
        #[arg(long, global = true)]
        json: bool,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "rekening_core=warn",
        1 => "rekening_core=info",
        _ => "rekening_core=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Format { text, json } => format::run(&text, json)?,
        Commands::Validate { amount, recipient, balance_text, json } => {
            return validate::run(validate::ValidateArgs { amount, recipient, balance_text, json });
        }
        Commands::Balance { json } => balance::run(json)?,
        Commands::Transactions { json } => transactions::run(json)?,
        Commands::Watch { route, interval, ticks } => watch::run(watch::WatchArgs { route, interval, ticks })?,
        Commands::Config { command, json } => config::run(command, json)?,
        Commands::Logs { command } => logs::run(command)?,
    }
    Ok(ExitCode::SUCCESS)
}
