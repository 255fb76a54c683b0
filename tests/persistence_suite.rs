mod common;

use std::fs;

use common::pay;
use tempfile::tempdir;
use trousseau::{
    ledger::{CategoryDraft, Ledger},
    storage::{
        load_ledger, local, save_ledger, FileStore, KeyValueStore, RemoteSnapshot, RemoteStore,
        SqliteRemote,
    },
};

#[test]
fn every_scalar_and_collection_lands_in_its_own_file() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    let mut ledger = Ledger::seeded();
    ledger.set_balance(12_345.0);
    pay(&mut ledger, "venue", 345.0);
    save_ledger(&store, &ledger).unwrap();

    for key in [
        local::KEY_MONTHLY_INCOME,
        local::KEY_MONTHLY_SAVINGS,
        local::KEY_BALANCE,
        local::KEY_TOTAL_BUDGET,
        local::KEY_CATEGORIES,
        local::KEY_PAYMENTS,
    ] {
        assert!(dir.path().join(key).is_file(), "missing file for {key}");
    }

    let balance = fs::read_to_string(dir.path().join(local::KEY_BALANCE)).unwrap();
    assert_eq!(balance, "12000");
}

#[test]
fn a_fresh_directory_hydrates_the_seeded_ledger() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    let ledger = load_ledger(&store);
    assert_eq!(ledger, Ledger::seeded());
    assert_eq!(ledger.monthly_income, 30_000.0);
    assert_eq!(ledger.monthly_savings, 25_000.0);
    assert_eq!(ledger.balance, 0.0);
    assert_eq!(ledger.categories.len(), 8);
}

#[test]
fn a_corrupt_key_falls_back_without_dragging_the_rest_down() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    let mut ledger = Ledger::seeded();
    ledger.set_balance(4_200.0);
    ledger.add_category(CategoryDraft::fixed("Cake", 900.0));
    save_ledger(&store, &ledger).unwrap();

    fs::write(dir.path().join(local::KEY_CATEGORIES), "{not json").unwrap();

    let loaded = load_ledger(&store);
    assert_eq!(loaded.balance, 4_200.0);
    assert_eq!(loaded.categories, Ledger::seed_categories());
}

#[test]
fn a_second_handle_over_the_same_directory_sees_the_saved_state() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    let mut ledger = Ledger::seeded();
    ledger.set_balance(64_000.0);
    ledger.set_total_budget(80_000.0);
    let cake = ledger.add_category(CategoryDraft::fixed("Cake", 900.0));
    pay(&mut ledger, &cake, 100.0);
    pay(&mut ledger, "venue", 9_000.0);
    save_ledger(&store, &ledger).unwrap();

    let reopened = FileStore::new(dir.path()).unwrap();
    assert_eq!(load_ledger(&reopened), ledger);
}

#[test]
fn an_explicit_zero_is_not_mistaken_for_a_missing_value() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    store.set(local::KEY_MONTHLY_SAVINGS, "0").unwrap();

    let ledger = load_ledger(&store);
    assert_eq!(ledger.monthly_savings, 0.0);
    assert_eq!(ledger.monthly_income, 30_000.0);
}

#[test]
fn sqlite_remote_round_trips_between_independent_handles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let mut ledger = Ledger::seeded();
    ledger.set_balance(5_500.0);
    pay(&mut ledger, "dress", 500.0);

    let writer = SqliteRemote::new(&path);
    writer
        .upsert(&RemoteSnapshot::capture(&ledger, chrono::Utc::now()))
        .unwrap();

    let reader = SqliteRemote::new(&path);
    let snapshot = reader.fetch().unwrap().expect("row present");
    assert_eq!(snapshot.balance, Some(5_000.0));
    assert_eq!(snapshot.payments.as_ref().map(Vec::len), Some(1));

    let mut restored = Ledger::seeded();
    snapshot.apply(&mut restored);
    assert_eq!(restored, ledger);
}
