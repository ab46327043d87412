//! Banking API client
//!
//! Talks to the bank server's JSON endpoints: the balance query used by the
//! poller and the recent-transactions listing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::domain::balance::decimal_from_json;
use crate::domain::result::{Error, Result};
use crate::domain::{BalanceSnapshot, RecentTransaction};
use crate::ports::BalanceSource;

/// Body of `GET /api/balance`
///
/// `balance` is kept as raw JSON so numbers and numeric strings are both
/// accepted; anything else fails the fetch.
#[derive(Debug, Deserialize)]
struct BalanceResponse {
    #[serde(default)]
    balance: JsonValue,
    #[serde(default)]
    account_number: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
}

/// Connection settings for [`HttpBalanceClient`]
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub balance_path: String,
    pub recent_transactions_path: String,
    pub timeout: Option<Duration>,
    pub session_cookie: Option<String>,
}

impl HttpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            balance_path: config.balance_path.clone(),
            recent_transactions_path: config.recent_transactions_path.clone(),
            timeout: config.request_timeout(),
            session_cookie: config.session_cookie.clone(),
        }
    }

    /// Settings for a server at `base_url` with the default endpoint paths
    pub fn with_base_url(base_url: &str) -> Self {
        let mut settings = Self::from_config(&Config::default());
        settings.base_url = base_url.to_string();
        settings
    }
}

/// HTTP client for the bank's JSON API
#[derive(Debug, Clone)]
pub struct HttpBalanceClient {
    client: Client,
    balance_url: Url,
    recent_transactions_url: Url,
}

impl HttpBalanceClient {
    /// Create a client, validating the base URL
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let base = Url::parse(&settings.base_url)
            .map_err(|e| Error::config(format!("Invalid base URL {:?}: {}", settings.base_url, e)))?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(Error::config(format!(
                "Base URL must use http or https, got {}",
                base.scheme()
            )));
        }

        let balance_url = base
            .join(&settings.balance_path)
            .map_err(|e| Error::config(format!("Invalid balance path: {}", e)))?;
        let recent_transactions_url = base
            .join(&settings.recent_transactions_path)
            .map_err(|e| Error::config(format!("Invalid transactions path: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = &settings.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| Error::config(format!("Invalid session cookie: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            balance_url,
            recent_transactions_url,
        })
    }

    pub fn balance_url(&self) -> &Url {
        &self.balance_url
    }

    /// Fetch the current balance
    pub async fn get_balance(&self) -> Result<BalanceSnapshot> {
        let body = self.get_json(&self.balance_url).await?;
        let data: BalanceResponse = serde_json::from_value(body)?;

        let balance = decimal_from_json(&data.balance).ok_or_else(|| {
            if data.balance.is_number() {
                Error::decode(format!("Balance {} is outside the supported range", data.balance))
            } else {
                Error::decode(format!("Response has no numeric balance (got {})", data.balance))
            }
        })?;

        Ok(BalanceSnapshot::new(balance).with_holder(data.account_number, data.full_name))
    }

    /// Fetch the most recent transactions, newest first
    pub async fn recent_transactions(&self) -> Result<Vec<RecentTransaction>> {
        let body = self.get_json(&self.recent_transactions_url).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn get_json(&self, url: &Url) -> Result<JsonValue> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl BalanceSource for HttpBalanceClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_balance(&self) -> Result<BalanceSnapshot> {
        self.get_balance().await
    }
}
