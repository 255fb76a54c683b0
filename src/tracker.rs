//! The tracker owns the moving parts: ledger state, the local store, the sync
//! engine, and the clock. Lifecycle is initialize, operate, flush on exit.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    config::{self, RemoteSettings},
    errors::Result,
    ledger::{
        ledger_warnings, Category, CategoryDraft, CategoryEdit, Ledger, LedgerMetrics, Payment,
        PaymentDraft,
    },
    storage::{self, FileStore, KeyValueStore, RemoteStore},
    sync::{SyncEngine, SyncStatus},
    time::{Clock, SystemClock},
};

/// Facade the presentation layer talks to. Every mutation lands in the ledger
/// first, then is published: written to local storage immediately and queued
/// for the debounced remote upsert.
pub struct BudgetTracker {
    ledger: Ledger,
    local: Box<dyn KeyValueStore>,
    sync: SyncEngine,
    clock: Arc<dyn Clock>,
}

impl BudgetTracker {
    pub fn new(
        local: Box<dyn KeyValueStore>,
        remote: Box<dyn RemoteStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_engine(local, SyncEngine::new(remote), clock)
    }

    /// Wires a pre-built engine, letting tests shrink the debounce window.
    pub fn with_engine(
        local: Box<dyn KeyValueStore>,
        sync: SyncEngine,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger: Ledger::seeded(),
            local,
            sync,
            clock,
        }
    }

    /// Builds the production wiring from the environment: file-per-key store
    /// in the data directory, remote per `TROUSSEAU_REMOTE_*`.
    pub fn from_env() -> Result<Self> {
        let local = FileStore::open_default()?;
        let remote = config::open_remote(&RemoteSettings::from_env());
        Ok(Self::new(Box::new(local), remote, Arc::new(SystemClock)))
    }

    /// Hydrates from local storage, runs the one-time remote read, then
    /// persists the merged result and schedules the first upsert.
    pub fn initialize(&mut self) {
        self.ledger = storage::load_ledger(self.local.as_ref());
        self.sync.startup(&mut self.ledger);
        self.publish();
    }

    pub fn add_payment(&mut self, draft: PaymentDraft) -> Result<Uuid> {
        let id = self.ledger.add_payment(draft)?;
        self.publish();
        Ok(id)
    }

    pub fn delete_payment(&mut self, id: Uuid) -> Option<Payment> {
        let removed = self.ledger.delete_payment(id);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    pub fn add_category(&mut self, draft: CategoryDraft) -> String {
        let id = self.ledger.add_category(draft);
        self.publish();
        id
    }

    pub fn delete_category(&mut self, id: &str) -> Option<Category> {
        let removed = self.ledger.delete_category(id);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    pub fn edit_category(&mut self, id: &str, edit: CategoryEdit) -> Result<()> {
        self.ledger.edit_category(id, edit)?;
        self.publish();
        Ok(())
    }

    pub fn set_balance(&mut self, balance: f64) {
        self.ledger.set_balance(balance);
        self.publish();
    }

    pub fn set_total_budget(&mut self, total_budget: f64) {
        self.ledger.set_total_budget(total_budget);
        self.publish();
    }

    pub fn set_monthly_income(&mut self, monthly_income: f64) {
        self.ledger.set_monthly_income(monthly_income);
        self.publish();
    }

    pub fn set_monthly_savings(&mut self, monthly_savings: f64) {
        self.ledger.set_monthly_savings(monthly_savings);
        self.publish();
    }

    /// Fires the pending remote upsert once its quiet period has elapsed.
    pub fn tick(&mut self) {
        self.sync.tick(&self.ledger, self.clock.now());
    }

    /// Pushes any pending upsert immediately; call before exit.
    pub fn flush(&mut self) {
        self.sync.flush(&self.ledger, self.clock.now());
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn metrics(&self) -> LedgerMetrics {
        LedgerMetrics::for_ledger(&self.ledger)
    }

    pub fn status(&self) -> SyncStatus {
        self.sync.status()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.sync.last_error()
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.sync.is_remote_enabled()
    }

    pub fn has_pending_upsert(&self) -> bool {
        self.sync.has_pending_upsert()
    }

    pub fn warnings(&self) -> Vec<String> {
        ledger_warnings(&self.ledger)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn publish(&mut self) {
        if let Err(err) = storage::save_ledger(self.local.as_ref(), &self.ledger) {
            self.sync.record_local_failure(&err);
        }
        self.sync.schedule_upsert(self.clock.now());
    }
}
