#![allow(dead_code)]

//! Shared fixtures for the integration suites.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use trousseau::{
    errors::{LedgerError, Result},
    ledger::{Ledger, PaymentDraft},
    storage::{KeyValueStore, RemoteSnapshot, RemoteStore},
    time::Clock,
};
use uuid::Uuid;

/// Clock that only moves when a test tells it to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn at_epoch() -> Self {
        Self::starting_at(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// In-memory remote with switchable failure modes and an upsert counter.
#[derive(Clone, Default)]
pub struct FakeRemote {
    inner: Arc<FakeRemoteInner>,
}

#[derive(Default)]
struct FakeRemoteInner {
    snapshot: Mutex<Option<RemoteSnapshot>>,
    fail_fetch: AtomicBool,
    fail_upsert: AtomicBool,
    upserts: AtomicUsize,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(snapshot: RemoteSnapshot) -> Self {
        let remote = Self::default();
        *remote.inner.snapshot.lock().expect("snapshot lock") = Some(snapshot);
        remote
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.inner.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_upsert(&self, fail: bool) {
        self.inner.fail_upsert.store(fail, Ordering::SeqCst);
    }

    pub fn upsert_count(&self) -> usize {
        self.inner.upserts.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Option<RemoteSnapshot> {
        self.inner.snapshot.lock().expect("snapshot lock").clone()
    }
}

impl RemoteStore for FakeRemote {
    fn fetch(&self) -> Result<Option<RemoteSnapshot>> {
        if self.inner.fail_fetch.load(Ordering::SeqCst) {
            return Err(LedgerError::RemoteRead("fetch refused".into()));
        }
        Ok(self.snapshot())
    }

    fn upsert(&self, snapshot: &RemoteSnapshot) -> Result<()> {
        if self.inner.fail_upsert.load(Ordering::SeqCst) {
            return Err(LedgerError::RemoteWrite("upsert refused".into()));
        }
        self.inner.upserts.fetch_add(1, Ordering::SeqCst);
        *self.inner.snapshot.lock().expect("snapshot lock") = Some(snapshot.clone());
        Ok(())
    }
}

/// Local store whose writes always fail.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(LedgerError::Storage("disk full".into()))
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn pay(ledger: &mut Ledger, category: &str, amount: f64) -> Uuid {
    ledger
        .add_payment(PaymentDraft::new(category, amount, date(2026, 6, 1)))
        .expect("payment accepted")
}
