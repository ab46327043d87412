//! Balance poller - periodic refresh of the balance display
//!
//! Each tick fetches the balance and rewrites the display text. Ticks are
//! independent: a slow request does not hold back the next one, and a failed
//! one is only logged. The poller runs as an owned task; stopping or dropping
//! its [`PollerHandle`] cancels the timer and any request still in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{PageConfig, DEFAULT_POLL_INTERVAL_SECS};
use crate::domain::money::{format_currency, NumberLocale};
use crate::domain::result::Result;
use crate::domain::BalanceSnapshot;
use crate::ports::{BalanceSource, FieldRole, PageView};
use crate::services::logging::{LogEvent, LoggingService};

/// Periodic balance refresher
pub struct BalancePoller {
    source: Arc<dyn BalanceSource>,
    view: Arc<dyn PageView>,
    logger: Arc<LoggingService>,
    interval: Duration,
    locale: NumberLocale,
    currency_label: String,
    page: Option<String>,
}

impl BalancePoller {
    pub fn new(
        source: Arc<dyn BalanceSource>,
        view: Arc<dyn PageView>,
        logger: Arc<LoggingService>,
        config: &PageConfig,
    ) -> Self {
        Self {
            source,
            view,
            logger,
            interval: config.poll_interval,
            locale: config.locale,
            currency_label: config.currency_label.clone(),
            page: None,
        }
    }

    /// Route the poller runs on, recorded with failures
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Display text for a snapshot, e.g. `Rp 1.234.567,50`
    pub fn render(&self, snapshot: &BalanceSnapshot) -> String {
        format_currency(snapshot.balance, &self.currency_label, self.locale)
    }

    /// Fetch once and write the display.
    ///
    /// Returns the text written, or `None` when the page has no balance
    /// display. Errors leave the display untouched.
    pub async fn refresh_once(&self) -> Result<Option<String>> {
        let snapshot = self.source.fetch_balance().await?;
        let text = self.render(&snapshot);

        if self.view.set_text(FieldRole::BalanceDisplay, &text) {
            Ok(Some(text))
        } else {
            Ok(None)
        }
    }

    /// One timer tick. Never fails: errors go to the log.
    pub async fn tick(&self) {
        match self.refresh_once().await {
            Ok(Some(_)) => debug!(source = self.source.name(), "Balance display refreshed"),
            Ok(None) => debug!("No balance display on page, skipping update"),
            Err(e) => {
                let mut event = LogEvent::new("balance_refresh_failed")
                    .with_source(self.source.name())
                    .with_error(format!("Error refreshing balance: {}", e));
                if let Some(page) = &self.page {
                    event = event.with_page(page.clone());
                }
                if let Err(log_err) = self.logger.log(event) {
                    warn!(error = %log_err, "Failed to record balance refresh error");
                }
            }
        }
    }

    /// Start the repeating timer on the current tokio runtime.
    ///
    /// The first tick fires one full interval after start.
    pub fn start(self: Arc<Self>) -> PollerHandle {
        let period = if self.interval.is_zero() {
            warn!("Poll interval is zero, using the default");
            Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
        } else {
            self.interval
        };

        info!(interval_secs = period.as_secs_f64(), "Starting balance poller");
        let task = tokio::spawn(self.run(period));

        PollerHandle { task: Some(task) }
    }

    async fn run(self: Arc<Self>, period: Duration) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Dropped with this task, which aborts requests still in flight
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let poller = Arc::clone(&self);
                    in_flight.spawn(async move { poller.tick().await });
                }
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
            }
        }
    }
}

/// Owner of a running poller
///
/// Dropping the handle stops the poller.
#[derive(Debug)]
pub struct PollerHandle {
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the timer and in-flight requests
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Balance poller stopped");
        }
    }

    /// Stop and wait until the task has wound down
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
            info!("Balance poller stopped");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
