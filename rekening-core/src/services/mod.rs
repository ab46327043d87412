//! Service layer - page behavior orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! covers one page concern.

pub mod formatter;
pub mod logging;
pub mod page;
pub mod poller;
pub mod transfer;

pub use formatter::CurrencyInputFormatter;
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use page::{EventOutcome, PageEvent, PageSession};
pub use poller::{BalancePoller, PollerHandle};
pub use transfer::{SubmitOutcome, TransferValidator};
