//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP client for the BalanceSource port
//! - In-memory page view for the PageView port

pub mod http;
pub mod memory_view;

#[cfg(test)]
pub mod balance_mock;
