//! Configuration management
//!
//! Settings live in `settings.json` inside the rekening directory:
//! ```json
//! {
//!   "baseUrl": "http://127.0.0.1:5000",
//!   "pollIntervalSecs": 30,
//!   "dashboardRoute": "/dashboard",
//!   "locale": "id-ID",
//!   "minTransfer": 1000
//! }
//! ```
//! Every key is optional. Keys this crate does not know are preserved on save.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::domain::money::NumberLocale;
use crate::domain::result::Error;
use crate::domain::validation::{TransferRules, DEFAULT_ACCOUNT_DIGITS, DEFAULT_MIN_TRANSFER};

pub const SETTINGS_FILE: &str = "settings.json";

/// Environment variable overriding `baseUrl`
pub const BASE_URL_ENV: &str = "REKENING_BASE_URL";

/// Environment variable forcing the balance poller on or off
pub const POLLING_ENABLED_ENV: &str = "REKENING_POLLING_ENABLED";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_BALANCE_PATH: &str = "/api/balance";
const DEFAULT_RECENT_TRANSACTIONS_PATH: &str = "/api/transactions/recent";
const DEFAULT_DASHBOARD_ROUTE: &str = "/dashboard";
const DEFAULT_CURRENCY_LABEL: &str = "Rp";

/// Seconds between balance refreshes
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Rekening configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub base_url: String,
    pub balance_path: String,
    pub recent_transactions_path: String,
    pub poll_interval_secs: u64,
    /// Route on which the balance poller runs
    pub dashboard_route: String,
    /// Forces the poller on or off regardless of route
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polling_enabled: Option<bool>,
    pub locale: NumberLocale,
    pub currency_label: String,
    pub min_transfer: u64,
    pub account_number_digits: usize,
    /// No timeout when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// Sent verbatim as the `Cookie` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
    // Keep unknown settings for preservation when saving
    #[serde(flatten)]
    other: HashMap<String, JsonValue>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            balance_path: DEFAULT_BALANCE_PATH.to_string(),
            recent_transactions_path: DEFAULT_RECENT_TRANSACTIONS_PATH.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            dashboard_route: DEFAULT_DASHBOARD_ROUTE.to_string(),
            polling_enabled: None,
            locale: NumberLocale::IdId,
            currency_label: DEFAULT_CURRENCY_LABEL.to_string(),
            min_transfer: DEFAULT_MIN_TRANSFER,
            account_number_digits: DEFAULT_ACCOUNT_DIGITS,
            request_timeout_secs: None,
            session_cookie: None,
            other: HashMap::new(),
        }
    }
}

/// Settings handed to the page components at construction
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub polling_enabled: bool,
    pub poll_interval: Duration,
    pub locale: NumberLocale,
    pub currency_label: String,
    pub transfer_rules: TransferRules,
}

impl Default for PageConfig {
    fn default() -> Self {
        Config::default().page_config(None)
    }
}

fn parse_bool_env(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load config from the rekening directory
    ///
    /// A missing file gives the defaults. An unreadable settings file is
    /// logged and ignored. Environment overrides:
    /// 1. `REKENING_BASE_URL` replaces `baseUrl`
    /// 2. `REKENING_POLLING_ENABLED` replaces `pollingEnabled`
    pub fn load(dir: &Path) -> Result<Self> {
        let mut config = Self::load_file(dir)?;

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }

        if let Some(enabled) = std::env::var(POLLING_ENABLED_ENV)
            .ok()
            .as_deref()
            .and_then(parse_bool_env)
        {
            config.polling_enabled = Some(enabled);
        }

        config.validate()?;
        Ok(config)
    }

    /// Read only the settings file: no environment overrides, no validation
    pub fn load_file(dir: &Path) -> Result<Self> {
        let settings_path = dir.join(SETTINGS_FILE);
        if !settings_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&settings_path)
            .with_context(|| format!("Failed to read {:?}", settings_path))?;
        Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = ?settings_path, error = %e, "Ignoring malformed settings file");
            Config::default()
        }))
    }

    /// Change one setting by its camelCase key
    ///
    /// The value is read as JSON when it parses (`5000`, `true`, `null`) and
    /// as a plain string otherwise. The whole config is validated before the
    /// change is applied.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parsed = serde_json::from_str(value).unwrap_or_else(|_| JsonValue::String(value.to_string()));

        let mut raw = serde_json::to_value(&*self)?;
        raw.as_object_mut()
            .context("Settings are not a JSON object")?
            .insert(key.to_string(), parsed);

        let updated: Config = serde_json::from_value(raw)
            .with_context(|| format!("Invalid value for {}: {}", key, value))?;
        if updated.other.contains_key(key) {
            bail!("Unknown setting: {}", key);
        }
        updated.validate()?;

        *self = updated;
        Ok(())
    }

    /// Save config to the rekening directory
    pub fn save(&self, dir: &Path) -> Result<()> {
        let settings_path = dir.join(SETTINGS_FILE);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {:?}", settings_path))?;
        Ok(())
    }

    /// Reject settings the components cannot run with
    pub fn validate(&self) -> std::result::Result<(), Error> {
        if self.poll_interval_secs == 0 {
            return Err(Error::config("pollIntervalSecs must be at least 1"));
        }
        if self.account_number_digits == 0 {
            return Err(Error::config("accountNumberDigits must be at least 1"));
        }
        if !self.balance_path.starts_with('/') || !self.recent_transactions_path.starts_with('/') {
            return Err(Error::config("API paths must start with '/'"));
        }
        Ok(())
    }

    /// Whether the poller should run for a page route
    pub fn polling_enabled_for(&self, route: Option<&str>) -> bool {
        self.polling_enabled
            .unwrap_or_else(|| route == Some(self.dashboard_route.as_str()))
    }

    /// Build the component settings for the page at `route`
    pub fn page_config(&self, route: Option<&str>) -> PageConfig {
        PageConfig {
            polling_enabled: self.polling_enabled_for(route),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            locale: self.locale,
            currency_label: self.currency_label.clone(),
            transfer_rules: TransferRules {
                min_amount: self.min_transfer,
                account_digits: self.account_number_digits,
            },
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
