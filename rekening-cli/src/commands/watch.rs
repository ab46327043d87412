//! Watch command - mount a page session and follow the balance display

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Local;
use colored::Colorize;
use tokio::sync::mpsc;

use crate::output;
use rekening_core::adapters::memory_view::MemoryView;
use rekening_core::domain::result::Result as CoreResult;
use rekening_core::ports::{BalanceSource, FieldRole, PageView};
use rekening_core::services::PageSession;
use rekening_core::BalanceSnapshot;

use super::{block_on, get_context, get_logger, log_command};

/// Page view that prints the balance display whenever it changes
struct TerminalView {
    inner: MemoryView,
}

impl PageView for TerminalView {
    fn amount_field_count(&self) -> usize {
        self.inner.amount_field_count()
    }

    fn text(&self, role: FieldRole) -> Option<String> {
        self.inner.text(role)
    }

    fn set_text(&self, role: FieldRole, text: &str) -> bool {
        let changed = self.inner.text(role).as_deref() != Some(text);
        let written = self.inner.set_text(role, text);
        if written && changed && role == FieldRole::BalanceDisplay {
            println!("[{}] {}", Local::now().format("%H:%M:%S").to_string().dimmed(), text.bold());
        }
        written
    }

    fn has_transfer_form(&self) -> bool {
        self.inner.has_transfer_form()
    }

    fn alert(&self, message: &str) {
        self.inner.alert(message);
        output::warning(message);
    }
}

/// Reports each finished fetch, successful or not
struct TickReporter {
    inner: Arc<dyn BalanceSource>,
    done: mpsc::UnboundedSender<()>,
}

#[async_trait]
impl BalanceSource for TickReporter {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch_balance(&self) -> CoreResult<BalanceSnapshot> {
        let result = self.inner.fetch_balance().await;
        let _ = self.done.send(());
        result
    }
}

pub struct WatchArgs {
    pub route: Option<String>,
    pub interval: Option<u64>,
    pub ticks: Option<usize>,
}

pub fn run(args: WatchArgs) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    let route = args.route.unwrap_or_else(|| ctx.config.dashboard_route.clone());
    let mut page_config = ctx.config.page_config(Some(&route));
    if let Some(secs) = args.interval {
        page_config.poll_interval = Duration::from_secs(secs);
    }

    if !page_config.polling_enabled {
        output::warning(&format!(
            "Balance polling is off for route {} (dashboard route is {})",
            route, ctx.config.dashboard_route
        ));
        return Ok(());
    }

    log_command(&logger, "watch");

    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let source = Arc::new(TickReporter {
        inner: Arc::clone(&ctx.client) as Arc<dyn BalanceSource>,
        done: done_tx,
    });
    let view = Arc::new(TerminalView {
        inner: MemoryView::dashboard(""),
    });

    output::info(&format!(
        "Watching {} every {}s on {} (Ctrl-C to stop)",
        ctx.client.balance_url(),
        page_config.poll_interval.as_secs(),
        route
    ));

    block_on(async move {
        let mut session = PageSession::attach(view, source, Arc::clone(&ctx.logger), &page_config, Some(&route));
        session.mount();

        let mut finished = 0usize;
        loop {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    signal.context("Failed to listen for Ctrl-C")?;
                    println!();
                    break;
                }
                Some(()) = done_rx.recv() => {
                    finished += 1;
                    if args.ticks.is_some_and(|n| finished >= n) {
                        break;
                    }
                }
            }
        }

        session.unmount();
        output::info(&format!("Stopped after {} refresh(es)", finished));
        Ok::<(), anyhow::Error>(())
    })?
}
