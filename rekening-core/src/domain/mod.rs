//! Core domain entities
//!
//! Plain data and pure functions: money text handling, transfer rules and
//! the balance/transaction models. No I/O.

pub mod balance;
pub mod money;
pub mod result;
mod transaction;
pub mod validation;

pub use balance::BalanceSnapshot;
pub use money::NumberLocale;
pub use transaction::RecentTransaction;
pub use validation::{TransferForm, TransferRejection, TransferRules};
