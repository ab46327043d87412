//! CLI command implementations

pub mod balance;
pub mod config;
pub mod format;
pub mod logs;
pub mod transactions;
pub mod validate;
pub mod watch;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use rekening_core::services::{EntryPoint, LoggingService};
use rekening_core::{LogEvent, RekeningContext};

/// Environment variable pointing at the rekening directory
pub const REKENING_DIR_ENV: &str = "REKENING_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let rekening_dir = get_rekening_dir().ok()?;
    LoggingService::new(&rekening_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record a command execution, ignoring any errors
pub fn log_command(logger: &Option<LoggingService>, command: &str) {
    if let Some(l) = logger {
        let _ = l.log_command(command);
    }
}

/// Get the rekening directory from environment or default
pub fn get_rekening_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(REKENING_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".rekening"))
        .ok_or_else(|| anyhow!("Could not find home directory; set {}", REKENING_DIR_ENV))
}

/// Create the rekening context
pub fn get_context() -> Result<RekeningContext> {
    let rekening_dir = get_rekening_dir()?;

    std::fs::create_dir_all(&rekening_dir)
        .with_context(|| format!("Failed to create rekening directory: {:?}", rekening_dir))?;

    let ctx = RekeningContext::new(&rekening_dir, EntryPoint::Cli)
        .context("Failed to initialize rekening context")?;
    Ok(ctx)
}

/// Run a future to completion on a fresh runtime
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
