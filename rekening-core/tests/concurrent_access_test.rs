//! Concurrent access tests
//!
//! A page's handlers and its poller touch the same view and the same log at
//! the same time. These tests hammer both from several threads and check
//! that nothing is lost or torn.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture
//! Run specific test: cargo test --test concurrent_access_test test_name -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tempfile::TempDir;

use rekening_core::adapters::memory_view::MemoryView;
use rekening_core::config::{Config, PageConfig};
use rekening_core::domain::result::{Error, Result};
use rekening_core::ports::{BalanceSource, FieldRole, PageView};
use rekening_core::services::{EntryPoint, EventOutcome, LogEvent, LoggingService, PageEvent, PageSession};
use rekening_core::BalanceSnapshot;

/// Number of concurrent threads for stress tests
const THREAD_COUNT: usize = 6;

/// Number of iterations per thread
const ITERATIONS_PER_THREAD: usize = 25;

/// Alternates between a balance and a failure
struct FlakySource {
    calls: AtomicUsize,
}

#[async_trait]
impl BalanceSource for FlakySource {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn fetch_balance(&self) -> Result<BalanceSnapshot> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2)).await;
        if n % 2 == 0 {
            Ok(BalanceSnapshot::new(Decimal::new(750_000_25, 2)))
        } else {
            Err(Error::http("connection reset"))
        }
    }
}

/// Test: many threads appending to one file-backed log.
///
/// Every line must survive and parse back as an entry.
#[test]
fn test_concurrent_log_writes() {
    let temp_dir = TempDir::new().unwrap();
    let logger = Arc::new(LoggingService::new(temp_dir.path(), EntryPoint::Embedded, "test").unwrap());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ITERATIONS_PER_THREAD {
                    let event = LogEvent::new("balance_refresh_failed")
                        .with_source(format!("thread-{}", thread_id))
                        .with_error(format!("attempt {} failed", i));
                    logger.log(event).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected = (THREAD_COUNT * ITERATIONS_PER_THREAD) as u64;
    assert_eq!(logger.count().unwrap(), expected);
    assert_eq!(logger.get_errors(usize::MAX).unwrap().len() as u64, expected);

    let raw = std::fs::read_to_string(logger.log_path().unwrap()).unwrap();
    assert_eq!(raw.lines().count() as u64, expected);
}

/// Test: readers and a cleanup run while writers append.
#[test]
fn test_concurrent_reads_during_writes() {
    let temp_dir = TempDir::new().unwrap();
    let logger = Arc::new(LoggingService::new(temp_dir.path(), EntryPoint::Cli, "test").unwrap());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS_PER_THREAD {
                    if thread_id % 2 == 0 {
                        logger.log_page("/dashboard").unwrap();
                    } else {
                        let recent = logger.get_recent(5).unwrap();
                        assert!(recent.len() <= 5);
                        // nothing is old enough to be removed
                        assert_eq!(logger.delete_older_than_days(30).unwrap(), 0);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let writers = (THREAD_COUNT + 1) / 2;
    assert_eq!(logger.count().unwrap(), (writers * ITERATIONS_PER_THREAD) as u64);
}

/// Test: the user types into the amount field while the poller rewrites the
/// balance display on a multi-threaded runtime.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_typing_while_polling() {
    let view = Arc::new(MemoryView::transfer_page("Rp 0,00"));
    let source = Arc::new(FlakySource { calls: AtomicUsize::new(0) });
    let logger = Arc::new(LoggingService::in_memory(EntryPoint::Embedded, "test"));
    let config = PageConfig {
        polling_enabled: true,
        poll_interval: Duration::from_millis(10),
        ..Config::default().page_config(Some("/transfer"))
    };

    let mut session = PageSession::attach(
        Arc::clone(&view) as Arc<dyn PageView>,
        Arc::clone(&source) as Arc<dyn BalanceSource>,
        Arc::clone(&logger),
        &config,
        Some("/transfer"),
    );
    session.mount();
    let session = Arc::new(session);

    let typists: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let view = Arc::clone(&view);
            let session = Arc::clone(&session);
            tokio::task::spawn_blocking(move || {
                for i in 0..ITERATIONS_PER_THREAD {
                    view.set_text(FieldRole::Amount(0), &format!("{}x{}", i, 1000));
                    match session.handle(PageEvent::AmountInput(0)) {
                        EventOutcome::Rewritten(text) => {
                            assert!(text.chars().all(|c| c.is_ascii_digit()))
                        }
                        other => panic!("unexpected outcome {:?}", other),
                    }
                    session.handle(PageEvent::AmountBlur(0));
                }
            })
        })
        .collect();

    for typist in typists {
        typist.await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut session = Arc::try_unwrap(session).unwrap_or_else(|_| panic!("session still shared"));
    session.unmount();

    let calls = source.calls.load(Ordering::SeqCst);
    assert!(calls >= 2, "poller made only {} requests", calls);

    // Display is either untouched or a complete rendering
    let display = view.text(FieldRole::BalanceDisplay).unwrap();
    assert!(display == "Rp 0,00" || display == "Rp 750.000,25", "torn display: {}", display);

    // Whatever the last typist left behind is plain digits or grouped
    let amount = view.text(FieldRole::Amount(0)).unwrap();
    assert!(amount.chars().all(|c| c.is_ascii_digit() || c == '.'), "amount: {}", amount);

    assert!(!logger.get_errors(usize::MAX).unwrap().is_empty());
}
