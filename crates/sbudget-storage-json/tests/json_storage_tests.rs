use std::fs;

use chrono::{NaiveDate, TimeZone, Utc};
use sbudget_core::{CoreError, KeyValueStore, RecordStore, WriteBatch};
use sbudget_domain::{BudgetGoal, DistributionEntry, SavingsDistribution, Transaction};
use sbudget_storage_json::{ExportArchive, JsonFileStore};
use serde_json::json;
use tempfile::tempdir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

#[test]
fn json_store_persists_across_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data").join("store.json");

    {
        let records = RecordStore::open(JsonFileStore::open(&path).expect("open")).expect("records");
        records
            .create_transaction(&Transaction::expense(42.0, "Comida", day(3)))
            .expect("create");
        records
            .upsert_budget_goal(&BudgetGoal::new("Comida", 300.0).unwrap())
            .expect("goal");
    }

    let records = RecordStore::open(JsonFileStore::open(&path).expect("reopen")).expect("records");
    let txns = records.list_transactions().expect("list");
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount, 42.0);
    assert_eq!(records.list_budget_goals().unwrap()[0].monthly_goal_amount, 300.0);
    assert_eq!(records.list_distribution().unwrap().len(), 3);
}

#[test]
fn ids_are_not_reused_after_delete_and_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    let first = {
        let records = RecordStore::open(JsonFileStore::open(&path).unwrap()).unwrap();
        let id = records
            .create_transaction(&Transaction::savings(10.0, day(1)))
            .unwrap();
        records.delete_transaction(id).unwrap();
        id
    };
    let records = RecordStore::open(JsonFileStore::open(&path).unwrap()).unwrap();
    let second = records
        .create_transaction(&Transaction::savings(10.0, day(2)))
        .unwrap();
    assert!(second > first);
}

#[test]
fn corrupt_file_reports_storage_unavailable() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    fs::write(&path, "{ not json").unwrap();
    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, CoreError::StorageUnavailable(_)), "got {err:?}");
}

#[test]
fn batch_is_written_once_and_leaves_no_tmp_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    let store = JsonFileStore::open(&path).unwrap();
    let mut batch = WriteBatch::new();
    batch.put("a", json!(1)).put("b", json!(2)).remove("a");
    store.apply(batch).unwrap();

    let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, json!({ "b": 2 }));
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn replacing_distribution_drops_old_goals_on_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("store.json");
    let records = RecordStore::open(JsonFileStore::open(&path).unwrap()).unwrap();
    let validated = SavingsDistribution::new(vec![
        DistributionEntry::new("Casa", 70),
        DistributionEntry::new("Auto", 30),
    ])
    .validate()
    .unwrap();
    records.replace_distribution(&validated).unwrap();

    let reopened = RecordStore::open(JsonFileStore::open(&path).unwrap()).unwrap();
    let names: Vec<_> = reopened
        .list_distribution()
        .unwrap()
        .into_iter()
        .map(|entry| entry.goal_name)
        .collect();
    assert_eq!(names, vec!["Auto", "Casa"]);
}

#[test]
fn export_archive_writes_lists_and_prunes() {
    let dir = tempdir().expect("tempdir");
    let records = RecordStore::open(sbudget_core::MemoryStore::new()).unwrap();
    records
        .create_transaction(&Transaction::expense(9.5, "Salud", day(7)))
        .unwrap();
    let archive = ExportArchive::with_retention(dir.path().join("exports"), 2).unwrap();

    let mut written = Vec::new();
    for minute in 0..3 {
        let at = Utc.with_ymd_and_hms(2024, 5, 20, 9, minute, 0).unwrap();
        let note = (minute == 2).then_some("Fin de mes");
        written.push(archive.export(&records.snapshot(at).unwrap(), note).unwrap());
    }

    let listed = archive.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "simple_budget_20240520_0902_fin-de-mes.json");
    assert_eq!(listed[1].id, written[1].id);
    assert!(!written[0].path.exists());

    let loaded = archive.load(&listed[0].id).unwrap();
    assert_eq!(loaded.transactions.len(), 1);
    assert_eq!(loaded.savings_distribution.len(), 3);
}
