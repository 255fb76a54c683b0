//! SQLite-backed remote store: one `budget_state` row at a fixed id, living
//! in a database file both ends of the sync can reach.

use std::{fmt, path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    errors::{LedgerError, Result},
    ledger::{Category, Payment},
};

use super::remote::{RemoteSnapshot, RemoteStore};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS budget_state (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  monthly_income REAL,
  monthly_savings REAL,
  balance REAL,
  total_budget REAL,
  categories TEXT,
  payments TEXT,
  updated_at TEXT
);
";

/// Remote adapter over a shared SQLite file. Connections are opened per call;
/// traffic is one fetch at startup and debounced upserts afterwards.
pub struct SqliteRemote {
    path: PathBuf,
}

impl SqliteRemote {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }
}

impl RemoteStore for SqliteRemote {
    fn fetch(&self) -> Result<Option<RemoteSnapshot>> {
        let conn = self.connect().map_err(read_err)?;
        let row = conn
            .query_row(
                "SELECT monthly_income, monthly_savings, balance, total_budget,
                        categories, payments, updated_at
                 FROM budget_state WHERE id = 1",
                [],
                |row| {
                    Ok(RawRow {
                        monthly_income: row.get(0)?,
                        monthly_savings: row.get(1)?,
                        balance: row.get(2)?,
                        total_budget: row.get(3)?,
                        categories: row.get(4)?,
                        payments: row.get(5)?,
                        updated_at: row.get(6)?,
                    })
                },
            )
            .optional()
            .map_err(read_err)?;

        match row {
            Some(raw) => Ok(Some(raw.into_snapshot()?)),
            None => Ok(None),
        }
    }

    fn upsert(&self, snapshot: &RemoteSnapshot) -> Result<()> {
        let categories = encode_json(&snapshot.categories).map_err(write_err)?;
        let payments = encode_json(&snapshot.payments).map_err(write_err)?;
        let updated_at = snapshot.updated_at.map(|stamp| stamp.to_rfc3339());

        let conn = self.connect().map_err(write_err)?;
        conn.execute(
            "INSERT INTO budget_state
               (id, monthly_income, monthly_savings, balance, total_budget,
                categories, payments, updated_at)
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
               monthly_income = excluded.monthly_income,
               monthly_savings = excluded.monthly_savings,
               balance = excluded.balance,
               total_budget = excluded.total_budget,
               categories = excluded.categories,
               payments = excluded.payments,
               updated_at = excluded.updated_at",
            params![
                snapshot.monthly_income,
                snapshot.monthly_savings,
                snapshot.balance,
                snapshot.total_budget,
                categories,
                payments,
                updated_at,
            ],
        )
        .map_err(write_err)?;
        Ok(())
    }
}

struct RawRow {
    monthly_income: Option<f64>,
    monthly_savings: Option<f64>,
    balance: Option<f64>,
    total_budget: Option<f64>,
    categories: Option<String>,
    payments: Option<String>,
    updated_at: Option<String>,
}

impl RawRow {
    fn into_snapshot(self) -> Result<RemoteSnapshot> {
        Ok(RemoteSnapshot {
            monthly_income: self.monthly_income,
            monthly_savings: self.monthly_savings,
            balance: self.balance,
            total_budget: self.total_budget,
            categories: decode_json::<Vec<Category>>(self.categories, "categories")?,
            payments: decode_json::<Vec<Payment>>(self.payments, "payments")?,
            // Stamps written by other implementations may not parse; the
            // merge does not depend on them.
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
        })
    }
}

fn decode_json<T: serde::de::DeserializeOwned>(
    column: Option<String>,
    name: &str,
) -> Result<Option<T>> {
    match column {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| LedgerError::RemoteRead(format!("corrupt {name} column: {err}"))),
        None => Ok(None),
    }
}

fn encode_json<T: serde::Serialize>(
    value: &Option<T>,
) -> std::result::Result<Option<String>, serde_json::Error> {
    value.as_ref().map(serde_json::to_string).transpose()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.with_timezone(&Utc))
        .ok()
}

fn read_err(err: impl fmt::Display) -> LedgerError {
    LedgerError::RemoteRead(err.to_string())
}

fn write_err(err: impl fmt::Display) -> LedgerError {
    LedgerError::RemoteWrite(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CategoryDraft, Ledger, PaymentDraft};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn remote() -> (SqliteRemote, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        (SqliteRemote::new(temp.path().join("shared.db")), temp)
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::seeded();
        ledger.set_balance(50_000.0);
        let id = ledger.add_category(CategoryDraft::fixed("Honeymoon", 40_000.0));
        ledger
            .add_payment(PaymentDraft::new(
                &id,
                10_000.0,
                NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            ))
            .unwrap();
        ledger
    }

    #[test]
    fn fresh_database_has_no_row() {
        let (remote, _guard) = remote();
        assert!(remote.fetch().unwrap().is_none());
    }

    #[test]
    fn upsert_then_fetch_round_trips() {
        let (remote, _guard) = remote();
        let ledger = sample_ledger();
        let stamp = Utc::now();

        remote
            .upsert(&RemoteSnapshot::capture(&ledger, stamp))
            .unwrap();
        let fetched = remote.fetch().unwrap().expect("row exists");

        assert_eq!(fetched.balance, Some(50_000.0));
        assert_eq!(fetched.categories.as_ref().unwrap().len(), 9);
        assert_eq!(fetched.payments.as_ref().unwrap().len(), 1);
        assert!(fetched.updated_at.is_some());
    }

    #[test]
    fn repeated_upserts_keep_a_single_row() {
        let (remote, _guard) = remote();
        let ledger = sample_ledger();
        remote
            .upsert(&RemoteSnapshot::capture(&ledger, Utc::now()))
            .unwrap();
        remote
            .upsert(&RemoteSnapshot::capture(&ledger, Utc::now()))
            .unwrap();

        let conn = remote.connect().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM budget_state", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn partial_row_maps_null_columns_to_absent_fields() {
        let (remote, _guard) = remote();
        let conn = remote.connect().unwrap();
        conn.execute(
            "INSERT INTO budget_state (id, balance) VALUES (1, ?1)",
            params![1_234.5_f64],
        )
        .unwrap();

        let snapshot = remote.fetch().unwrap().expect("row exists");
        assert_eq!(snapshot.balance, Some(1_234.5));
        assert!(snapshot.monthly_income.is_none());
        assert!(snapshot.categories.is_none());
        assert!(snapshot.payments.is_none());
        assert!(snapshot.updated_at.is_none());
    }

    #[test]
    fn corrupt_collection_column_is_a_read_error() {
        let (remote, _guard) = remote();
        let conn = remote.connect().unwrap();
        conn.execute(
            "INSERT INTO budget_state (id, categories) VALUES (1, '{nope')",
            [],
        )
        .unwrap();

        let err = remote.fetch().expect_err("must fail");
        assert!(matches!(err, LedgerError::RemoteRead(_)));
    }

    #[test]
    fn unparsable_timestamp_is_tolerated() {
        let (remote, _guard) = remote();
        let conn = remote.connect().unwrap();
        conn.execute(
            "INSERT INTO budget_state (id, balance, updated_at) VALUES (1, 10.0, 'last tuesday')",
            [],
        )
        .unwrap();

        let snapshot = remote.fetch().unwrap().expect("row exists");
        assert_eq!(snapshot.balance, Some(10.0));
        assert!(snapshot.updated_at.is_none());
    }
}
