mod common;

use std::{fs, sync::Arc};

use common::{data_paths, date};
use sbudget_core::{FixedClock, KeyValueStore, TransactionDraft, WriteBatch};
use sbudget_domain::DistributionEntry;
use sbudget_storage_json::JsonFileStore;
use serde_json::json;
use simple_budget::app::FileSession;

#[test]
fn file_session_survives_restart() {
    let paths = data_paths();
    let clock = Arc::new(FixedClock::on(date(2024, 9, 10)));

    let id = {
        let mut session = FileSession::open(&paths, clock.clone()).expect("open");
        session
            .save_distribution(vec![
                DistributionEntry::new("Casa", 70),
                DistributionEntry::new("Viajes", 30),
            ])
            .expect("distribution");
        session.set_goal("Comida", 800.0).expect("goal");
        session
            .add_transaction(TransactionDraft::expense("55.25", date(2024, 9, 2)).category("Comida"))
            .expect("add")
    };

    let session = FileSession::open(&paths, clock).expect("reopen");
    let snapshot = session.state().snapshot();
    assert_eq!(snapshot.transactions.len(), 1);
    assert_eq!(snapshot.transactions[0].id, Some(id));
    assert_eq!(snapshot.distribution.len(), 2);
    assert_eq!(
        session.dashboard(None).category("Comida").unwrap().goal,
        800.0
    );
    assert!(paths.records_file.exists());
}

#[test]
fn failed_write_preserves_file_and_memory() {
    let paths = data_paths();
    let store = JsonFileStore::open(&paths.records_file).expect("open");
    store.set("kept", json!(1)).expect("initial write");
    let original = fs::read_to_string(&paths.records_file).expect("read original");

    // A directory at the temp path makes the next write fail before the rename.
    let mut tmp = paths.records_file.clone();
    tmp.set_extension("json.tmp");
    fs::create_dir_all(&tmp).unwrap();

    let mut batch = WriteBatch::new();
    batch.put("lost", json!(2)).remove("kept");
    assert!(store.apply(batch).is_err());

    assert_eq!(fs::read_to_string(&paths.records_file).unwrap(), original);
    assert_eq!(store.get("kept").unwrap(), Some(json!(1)));
    assert_eq!(store.get("lost").unwrap(), None);
}

#[test]
fn unreadable_records_file_fails_to_open() {
    let paths = data_paths();
    fs::create_dir_all(&paths.base).unwrap();
    fs::write(&paths.records_file, "[]").unwrap();
    let clock = Arc::new(FixedClock::on(date(2024, 9, 10)));
    let err = FileSession::open(&paths, clock).err().expect("open should fail");
    assert!(err.to_string().starts_with("Storage unavailable"));
}
