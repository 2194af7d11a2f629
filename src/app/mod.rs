//! Application layer: the explicit state and the session that drives it.

pub mod session;
pub mod state;

pub use session::{DataPaths, FileSession, Session, HOME_ENV};
pub use state::{parse_transaction_id, AppState, BudgetMode, Snapshot, View};
