//! sbudget-domain
//!
//! Pure domain models (Transaction, BudgetGoal, SavingsDistribution, Month).
//! No I/O, no CLI, no storage. Only data types and their invariants.

pub mod budget_goal;
pub mod common;
pub mod savings;
pub mod transaction;

pub use budget_goal::*;
pub use common::*;
pub use savings::*;
pub use transaction::*;
