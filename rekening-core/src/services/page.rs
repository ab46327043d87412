//! Page session - wires the components to one page view
//!
//! `attach` is the page-ready step: it looks at the page and decides which
//! handlers apply. `mount` and `unmount` bound the lifetime of the balance
//! poller, so navigating away never leaves a timer behind.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::PageConfig;
use crate::ports::{BalanceSource, PageView};
use crate::services::formatter::CurrencyInputFormatter;
use crate::services::logging::LoggingService;
use crate::services::poller::{BalancePoller, PollerHandle};
use crate::services::transfer::{SubmitOutcome, TransferValidator};

/// Events the host forwards from the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// The n-th amount input changed
    AmountInput(usize),
    /// The n-th amount input lost focus
    AmountBlur(usize),
    /// The transfer form is being submitted
    Submit,
}

/// Result of handling a [`PageEvent`]
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// No handler is attached for this event
    Ignored,
    /// A field was rewritten to the given text
    Rewritten(String),
    /// Submit decision; the host cancels the default action on `Block`
    Submit(SubmitOutcome),
}

/// Components attached to one page
pub struct PageSession {
    view: Arc<dyn PageView>,
    formatter: Option<CurrencyInputFormatter>,
    validator: Option<TransferValidator>,
    poller: Option<Arc<BalancePoller>>,
    poller_handle: Option<PollerHandle>,
    logger: Arc<LoggingService>,
    route: Option<String>,
}

impl PageSession {
    /// Attach handlers to a page
    ///
    /// - the formatter when the page has at least one amount input
    /// - the validator when the page has the transfer form
    /// - the poller when polling is enabled (started by [`mount`](Self::mount))
    pub fn attach(
        view: Arc<dyn PageView>,
        source: Arc<dyn BalanceSource>,
        logger: Arc<LoggingService>,
        config: &PageConfig,
        route: Option<&str>,
    ) -> Self {
        let formatter = (view.amount_field_count() > 0).then(|| CurrencyInputFormatter::new(config.locale));
        let validator = view
            .has_transfer_form()
            .then(|| TransferValidator::new(config.transfer_rules.clone()));

        let poller = config.polling_enabled.then(|| {
            let mut poller = BalancePoller::new(source, Arc::clone(&view), Arc::clone(&logger), config);
            if let Some(route) = route {
                poller = poller.with_page(route);
            }
            Arc::new(poller)
        });

        debug!(
            route = route.unwrap_or(""),
            formatter = formatter.is_some(),
            validator = validator.is_some(),
            poller = poller.is_some(),
            "Page attached"
        );

        Self {
            view,
            formatter,
            validator,
            poller,
            poller_handle: None,
            logger,
            route: route.map(str::to_string),
        }
    }

    /// Start the poller if one is attached. Must run inside a tokio runtime.
    pub fn mount(&mut self) {
        if self.poller_handle.is_some() {
            return;
        }
        if let Some(route) = &self.route {
            if let Err(e) = self.logger.log_page(route) {
                warn!(error = %e, "Failed to record page mount");
            }
        }
        if let Some(poller) = &self.poller {
            self.poller_handle = Some(Arc::clone(poller).start());
        }
    }

    /// Stop the poller
    pub fn unmount(&mut self) {
        if let Some(mut handle) = self.poller_handle.take() {
            handle.stop();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller_handle.as_ref().is_some_and(PollerHandle::is_running)
    }

    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    pub fn poller(&self) -> Option<&Arc<BalancePoller>> {
        self.poller.as_ref()
    }

    pub fn view(&self) -> &Arc<dyn PageView> {
        &self.view
    }

    /// Dispatch a page event to its handler
    pub fn handle(&self, event: PageEvent) -> EventOutcome {
        match event {
            PageEvent::AmountInput(index) => self
                .formatter
                .and_then(|f| f.handle_input(self.view.as_ref(), index))
                .map_or(EventOutcome::Ignored, EventOutcome::Rewritten),
            PageEvent::AmountBlur(index) => self
                .formatter
                .and_then(|f| f.handle_blur(self.view.as_ref(), index))
                .map_or(EventOutcome::Ignored, EventOutcome::Rewritten),
            PageEvent::Submit => match &self.validator {
                Some(validator) => EventOutcome::Submit(validator.on_submit(self.view.as_ref())),
                // Without a listener the form posts as usual
                None => EventOutcome::Submit(SubmitOutcome::Allow),
            },
        }
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use crate::adapters::memory_view::MemoryView;
    use crate::config::Config;
    use crate::domain::result::Result;
    use crate::domain::BalanceSnapshot;
    use crate::ports::FieldRole;
    use crate::services::logging::EntryPoint;

    struct FixedSource(Decimal);

    #[async_trait]
    impl BalanceSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_balance(&self) -> Result<BalanceSnapshot> {
            Ok(BalanceSnapshot::new(self.0))
        }
    }

    fn attach(view: Arc<MemoryView>, route: &str) -> PageSession {
        let config = Config::default().page_config(Some(route));
        PageSession::attach(
            view,
            Arc::new(FixedSource(Decimal::new(10_000_000, 0))),
            Arc::new(LoggingService::in_memory(EntryPoint::Embedded, "test")),
            &config,
            Some(route),
        )
    }

    #[test]
    fn test_transfer_page_attaches_formatter_and_validator() {
        let session = attach(Arc::new(MemoryView::transfer_page("Rp 100.000")), "/transfer");
        assert!(session.has_formatter());
        assert!(session.has_validator());
        assert!(session.poller().is_none());
    }

    #[test]
    fn test_page_without_form_allows_submit() {
        let view = Arc::new(MemoryView::new().with_amount_fields(1));
        let session = attach(Arc::clone(&view), "/deposit");

        assert!(!session.has_validator());
        assert_eq!(session.handle(PageEvent::Submit), EventOutcome::Submit(SubmitOutcome::Allow));
        assert!(view.alerts().is_empty());
    }

    #[test]
    fn test_events_flow_through_view() {
        let view = Arc::new(MemoryView::transfer_page("Rp 100.000"));
        let session = attach(Arc::clone(&view), "/transfer");

        view.set_text(FieldRole::Amount(0), "50.00a0");
        assert_eq!(session.handle(PageEvent::AmountInput(0)), EventOutcome::Rewritten("50000".to_string()));
        assert_eq!(session.handle(PageEvent::AmountBlur(0)), EventOutcome::Rewritten("50.000".to_string()));

        view.set_text(FieldRole::RecipientAccount, "1234567890123456");
        assert_eq!(session.handle(PageEvent::Submit), EventOutcome::Submit(SubmitOutcome::Allow));
    }

    #[test]
    fn test_amount_event_without_field_is_ignored() {
        let session = attach(Arc::new(MemoryView::dashboard("")), "/dashboard");
        assert_eq!(session.handle(PageEvent::AmountInput(0)), EventOutcome::Ignored);
        assert_eq!(session.handle(PageEvent::AmountBlur(3)), EventOutcome::Ignored);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dashboard_mount_and_unmount() {
        let view = Arc::new(MemoryView::dashboard("Rp 0,00"));
        let mut session = attach(Arc::clone(&view), "/dashboard");
        assert!(session.poller().is_some());
        assert!(!session.is_polling());

        session.mount();
        assert!(session.is_polling());

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(view.text(FieldRole::BalanceDisplay).as_deref(), Some("Rp 10.000.000,00"));

        session.unmount();
        assert!(!session.is_polling());

        view.set_text(FieldRole::BalanceDisplay, "stale");
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(view.text(FieldRole::BalanceDisplay).as_deref(), Some("stale"));
    }

    #[tokio::test]
    async fn test_mount_without_poller_is_noop() {
        let mut session = attach(Arc::new(MemoryView::transfer_page("")), "/transfer");
        session.mount();
        assert!(!session.is_polling());
    }
}
