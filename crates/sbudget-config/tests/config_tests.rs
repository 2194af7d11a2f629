use chrono::NaiveDate;
use sbudget_config::{ConfigError, Language, Settings, SettingsManager, SettingsPatch};
use std::fs;
use tempfile::tempdir;

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = SettingsManager::with_base_dir(dir.path().join("home")).expect("manager");
    assert!(!manager.settings_path().exists());
    assert_eq!(manager.load().expect("load"), Settings::default());
}

#[test]
fn settings_round_trip_through_disk() {
    let dir = tempdir().expect("tempdir");
    let manager = SettingsManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    let patch = SettingsPatch {
        dark_mode: Some(true),
        language: Some(Language::En),
        currency_symbol: Some("$".into()),
        last_export_date: NaiveDate::from_ymd_opt(2024, 6, 30),
        retention_months: Some(6),
    };
    let settings = Settings::default().merged(&patch).expect("merge");
    manager.save(&settings).expect("save");

    let loaded = manager.load().expect("load");
    assert_eq!(loaded, settings);
    let raw = fs::read_to_string(manager.settings_path()).unwrap();
    assert!(raw.contains("\"currencySymbol\": \"$\""));
    assert!(raw.contains("\"lastExportDate\": \"2024-06-30\""));
}

#[test]
fn malformed_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let manager = SettingsManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    fs::write(manager.settings_path(), "[1, 2").unwrap();
    assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
}

#[test]
fn partial_file_fills_missing_fields() {
    let dir = tempdir().expect("tempdir");
    let manager = SettingsManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    fs::write(manager.settings_path(), r#"{ "darkMode": true }"#).unwrap();
    let loaded = manager.load().expect("load");
    assert!(loaded.dark_mode);
    assert_eq!(loaded.currency_symbol, "Q");
    assert_eq!(loaded.retention_months, 12);
}
