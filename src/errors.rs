use std::result::Result as StdResult;

use sbudget_config::ConfigError;
use sbudget_core::CoreError;
use sbudget_domain::TransactionId;
use thiserror::Error;

/// Unified error type for the application layer.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Transaction #{0} not found")]
    TransactionNotFound(TransactionId),
    #[error("Savings distribution must total 100%, currently {0}%")]
    DistributionTotal(u32),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = StdResult<T, AppError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] AppError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::StorageUnavailable(message) => AppError::StorageUnavailable(message),
            CoreError::Storage(message) | CoreError::Serde(message) => {
                AppError::StorageError(message)
            }
            CoreError::Io(err) => AppError::StorageError(err.to_string()),
            CoreError::TransactionNotFound(id) => AppError::TransactionNotFound(id),
            CoreError::DistributionTotal { actual } => AppError::DistributionTotal(actual),
            CoreError::Validation(message) | CoreError::InvalidInput(message) => {
                AppError::InvalidInput(message)
            }
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => AppError::StorageError(io.to_string()),
            ConfigError::Serde(message) => AppError::ConfigError(message),
            ConfigError::Invalid(message) => AppError::InvalidInput(message),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(AppError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_total_keeps_actual_sum() {
        let err = AppError::from(CoreError::DistributionTotal { actual: 99 });
        assert_eq!(
            err.to_string(),
            "Savings distribution must total 100%, currently 99%"
        );
    }

    #[test]
    fn not_found_maps_to_transaction_not_found() {
        let err = AppError::from(CoreError::TransactionNotFound(TransactionId(7)));
        assert!(matches!(err, AppError::TransactionNotFound(TransactionId(7))));
        assert_eq!(err.to_string(), "Transaction #7 not found");
    }

    #[test]
    fn invalid_setting_is_invalid_input() {
        let err = AppError::from(ConfigError::Invalid("bad".into()));
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
