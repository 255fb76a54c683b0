//! Local persistence: a key-value store with one textual value per key, plus
//! the hydration rules that turn stored keys back into a ledger.

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::RwLock,
};

use tracing::warn;

use crate::{
    errors::{LedgerError, Result},
    ledger::{Category, Ledger, Payment},
};

pub const KEY_MONTHLY_INCOME: &str = "monthlyIncome";
pub const KEY_MONTHLY_SAVINGS: &str = "monthlySavings";
pub const KEY_BALANCE: &str = "balance";
pub const KEY_TOTAL_BUDGET: &str = "totalBudget";
pub const KEY_CATEGORIES: &str = "categories";
pub const KEY_PAYMENTS: &str = "payments";

/// Abstraction over the local store: scalar fields as plain numeric text,
/// collections as JSON arrays, one value per key.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key has never been set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-per-key store rooted at the data directory. Writes go through a
/// temporary file and a rename so readers never observe a partial value.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Opens the store in the configured data directory.
    pub fn open_default() -> Result<Self> {
        let dir = crate::config::data_dir();
        Self::new(&dir).map_err(|err| {
            LedgerError::Config(format!("data directory {} is unusable: {err}", dir.display()))
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        let tmp = self.root.join(format!("{key}.tmp"));
        write_atomic(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// In-memory store for tests and benchmarks.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| LedgerError::Storage("memory store lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| LedgerError::Storage("memory store lock poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Rebuilds a ledger from the store. Absent or unreadable keys fall back to
/// the fresh-install defaults; a stored zero is honored as a real value.
pub fn load_ledger(store: &dyn KeyValueStore) -> Ledger {
    let mut ledger = Ledger::seeded();
    if let Some(value) = read_number(store, KEY_MONTHLY_INCOME) {
        ledger.monthly_income = value;
    }
    if let Some(value) = read_number(store, KEY_MONTHLY_SAVINGS) {
        ledger.monthly_savings = value;
    }
    if let Some(value) = read_number(store, KEY_BALANCE) {
        ledger.balance = value;
    }
    if let Some(value) = read_number(store, KEY_TOTAL_BUDGET) {
        ledger.total_budget = value;
    }
    if let Some(categories) = read_json::<Vec<Category>>(store, KEY_CATEGORIES) {
        ledger.categories = categories;
    }
    if let Some(payments) = read_json::<Vec<Payment>>(store, KEY_PAYMENTS) {
        ledger.payments = payments;
    }
    ledger
}

/// Writes the full ledger state, one key at a time.
pub fn save_ledger(store: &dyn KeyValueStore, ledger: &Ledger) -> Result<()> {
    store.set(KEY_MONTHLY_INCOME, &ledger.monthly_income.to_string())?;
    store.set(KEY_MONTHLY_SAVINGS, &ledger.monthly_savings.to_string())?;
    store.set(KEY_BALANCE, &ledger.balance.to_string())?;
    store.set(KEY_TOTAL_BUDGET, &ledger.total_budget.to_string())?;
    store.set(KEY_CATEGORIES, &serde_json::to_string(&ledger.categories)?)?;
    store.set(KEY_PAYMENTS, &serde_json::to_string(&ledger.payments)?)?;
    Ok(())
}

fn read_raw(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, %err, "unreadable local key, using default");
            None
        }
    }
}

fn read_number(store: &dyn KeyValueStore, key: &str) -> Option<f64> {
    let raw = read_raw(store, key)?;
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            warn!(key, %raw, "unparsable numeric key, using default");
            None
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = read_raw(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, %err, "unparsable stored collection, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CategoryDraft, PaymentDraft, DEFAULT_MONTHLY_INCOME};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn file_store() -> (FileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = FileStore::new(temp.path()).expect("file store");
        (store, temp)
    }

    #[test]
    fn missing_key_reads_as_none() {
        let (store, _guard) = file_store();
        assert!(store.get(KEY_BALANCE).unwrap().is_none());
    }

    #[test]
    fn set_writes_the_key_as_a_plain_file() {
        let (store, guard) = file_store();
        store.set(KEY_BALANCE, "1250.5").unwrap();

        assert!(guard.path().join("balance").exists());
        assert!(!guard.path().join("balance.tmp").exists());
        assert_eq!(store.get(KEY_BALANCE).unwrap().as_deref(), Some("1250.5"));
    }

    #[test]
    fn empty_store_hydrates_to_seeded_defaults() {
        let store = MemoryStore::new();
        let ledger = load_ledger(&store);
        assert_eq!(ledger.monthly_income, DEFAULT_MONTHLY_INCOME);
        assert_eq!(ledger.balance, 0.0);
        assert_eq!(ledger.categories, Ledger::seed_categories());
    }

    #[test]
    fn stored_zero_is_not_replaced_by_the_default() {
        let store = MemoryStore::new();
        store.set(KEY_MONTHLY_INCOME, "0").unwrap();
        let ledger = load_ledger(&store);
        assert_eq!(ledger.monthly_income, 0.0);
    }

    #[test]
    fn unparsable_keys_fall_back_per_key() {
        let store = MemoryStore::new();
        store.set(KEY_MONTHLY_SAVINGS, "not-a-number").unwrap();
        store.set(KEY_CATEGORIES, "{broken json").unwrap();
        store.set(KEY_BALANCE, "750").unwrap();

        let ledger = load_ledger(&store);
        assert_eq!(ledger.monthly_savings, crate::ledger::DEFAULT_MONTHLY_SAVINGS);
        assert_eq!(ledger.categories, Ledger::seed_categories());
        assert_eq!(ledger.balance, 750.0);
    }

    #[test]
    fn save_and_load_round_trips_full_state() {
        let (store, _guard) = file_store();
        let mut ledger = Ledger::seeded();
        ledger.set_balance(12_000.0);
        ledger.set_total_budget(250_000.0);
        let id = ledger.add_category(CategoryDraft::fixed("Honeymoon", 40_000.0));
        ledger
            .add_payment(PaymentDraft::new(
                &id,
                5_000.0,
                NaiveDate::from_ymd_opt(2026, 6, 20).unwrap(),
            ))
            .unwrap();

        save_ledger(&store, &ledger).unwrap();
        let loaded = load_ledger(&store);
        assert_eq!(loaded, ledger);
    }

    #[test]
    fn collections_are_stored_as_camel_case_json() {
        let store = MemoryStore::new();
        let ledger = Ledger::seeded();
        save_ledger(&store, &ledger).unwrap();

        let raw = store.get(KEY_CATEGORIES).unwrap().unwrap();
        assert!(raw.contains("\"isRecurring\""));
        let raw = store.get(KEY_MONTHLY_INCOME).unwrap().unwrap();
        assert_eq!(raw, "30000");
    }
}
