//! Balance source port
//!
//! Defines the interface the poller uses to fetch the current balance.
//! The HTTP client adapter implements it against `/api/balance`; tests
//! substitute scripted sources.

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::BalanceSnapshot;

/// Anything that can report the account's current balance
///
/// Implementations must not retry or cache: the poller treats every call as
/// an independent attempt and logs failures itself.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Source name used in log events (e.g., "http")
    fn name(&self) -> &str;

    /// Fetch the current balance
    async fn fetch_balance(&self) -> Result<BalanceSnapshot>;
}
