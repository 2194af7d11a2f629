//! sbudget-core
//!
//! Record store and aggregation services for Simple Budget.
//! Depends on sbudget-domain. No CLI, no terminal I/O, no concrete storage backend.

pub mod budget_service;
pub mod error;
pub mod history_service;
pub mod record_store;
pub mod retention_service;
pub mod savings_service;
pub mod storage;
pub mod time;
pub mod transaction_service;

pub use budget_service::*;
pub use error::CoreError;
pub use history_service::*;
pub use record_store::*;
pub use retention_service::*;
pub use savings_service::*;
pub use storage::{KeyValueStore, MemoryStore, WriteBatch, WriteOp};
pub use time::{Clock, FixedClock};
pub use transaction_service::*;

#[cfg(test)]
mod tests;
