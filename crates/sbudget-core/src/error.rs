use std::io;

use sbudget_domain::{BudgetGoalError, DistributionError, TransactionId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
    #[error("Savings distribution must total 100%, currently {actual}%")]
    DistributionTotal { actual: u32 },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::TransactionNotFound(_))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}

impl From<DistributionError> for CoreError {
    fn from(err: DistributionError) -> Self {
        match err {
            DistributionError::TotalNot100 { actual } => CoreError::DistributionTotal { actual },
            other => CoreError::Validation(other.to_string()),
        }
    }
}

impl From<BudgetGoalError> for CoreError {
    fn from(err: BudgetGoalError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
