//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The services
//! depend only on these traits, not on concrete implementations.

mod balance_source;
mod view;

pub use balance_source::BalanceSource;
pub use view::{FieldRole, PageView};
