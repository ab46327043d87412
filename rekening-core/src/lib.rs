//! Rekening Core - client-side logic for the banking web pages
//!
//! This crate implements the page behavior following hexagonal architecture:
//!
//! - **domain**: Money text handling, transfer rules, balance/transaction models
//! - **ports**: Trait definitions for the page view and the balance source
//! - **services**: Input formatter, transfer validator, balance poller, page session
//! - **adapters**: Concrete implementations (reqwest HTTP client, in-memory view)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::http::{HttpBalanceClient, HttpSettings};
use config::Config;
use ports::PageView;
use services::{EntryPoint, LoggingService, PageSession};

// Re-export commonly used types at crate root
pub use domain::{BalanceSnapshot, NumberLocale, RecentTransaction, TransferRejection, TransferRules};
pub use domain::result::Error;
pub use services::{LogEntry, LogEvent};

/// Main context for rekening operations
///
/// Holds the configuration, the diagnostic log and the API client.
pub struct RekeningContext {
    pub config: Config,
    pub logger: Arc<LoggingService>,
    pub client: Arc<HttpBalanceClient>,
}

impl RekeningContext {
    /// Create a context from the rekening directory
    ///
    /// Settings come from `settings.json` plus environment overrides.
    pub fn new(dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        let config = Config::load(dir)?;
        Self::with_config(dir, config, entry_point)
    }

    /// Create a context from an already loaded config; logs go to `dir`
    pub fn with_config(dir: &Path, config: Config, entry_point: EntryPoint) -> Result<Self> {
        config.validate()?;
        let logger = Arc::new(LoggingService::new(dir, entry_point, env!("CARGO_PKG_VERSION"))?);
        let client = HttpBalanceClient::new(&HttpSettings::from_config(&config))
            .context("Failed to create API client")?;

        Ok(Self {
            config,
            logger,
            client: Arc::new(client),
        })
    }

    /// Attach the page components to a view for the page at `route`
    pub fn page_session(&self, view: Arc<dyn PageView>, route: Option<&str>) -> PageSession {
        let page_config = self.config.page_config(route);
        PageSession::attach(
            view,
            Arc::clone(&self.client) as Arc<dyn ports::BalanceSource>,
            Arc::clone(&self.logger),
            &page_config,
            route,
        )
    }
}
