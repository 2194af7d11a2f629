#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use sbudget_config::SettingsManager;
use sbudget_core::{FixedClock, MemoryStore, RecordStore};
use sbudget_storage_json::ExportArchive;
use simple_budget::app::{DataPaths, Session};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// File-backed paths under a unique temporary directory.
pub fn data_paths() -> DataPaths {
    DataPaths::new(temp_base())
}

/// Session over an in-memory store whose clock is pinned to `today`.
pub fn memory_session(today: NaiveDate) -> Session<MemoryStore> {
    let records = RecordStore::open(MemoryStore::new()).expect("open records");
    memory_session_with(records, temp_base(), today)
}

pub fn memory_session_with(
    records: RecordStore<MemoryStore>,
    base: PathBuf,
    today: NaiveDate,
) -> Session<MemoryStore> {
    let settings = SettingsManager::with_base_dir(base.clone()).expect("settings manager");
    let exports = ExportArchive::new(base.join("exports")).expect("export archive");
    Session::start(records, settings, exports, Arc::new(FixedClock::on(today))).expect("start session")
}
