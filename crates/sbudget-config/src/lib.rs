//! sbudget-config
//!
//! User preferences for Simple Budget and their persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::SettingsManager;
pub use model::{Language, Settings, SettingsPatch, MAX_RETENTION_MONTHS};
