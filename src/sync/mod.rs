//! Sync policy: the connectivity state machine and the schedule that mirrors
//! local mutations to the remote store.
//!
//! Local persistence is immediate and unconditional; the remote mirror gets a
//! debounced full-state upsert, attempted only while the session is online.
//! Remote failures park the session in `Error` without touching local writes.

pub mod debounce;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};

use crate::{
    errors::LedgerError,
    ledger::Ledger,
    storage::{RemoteSnapshot, RemoteStore},
};

/// Connectivity of the remote mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No remote configured this session; local-only operation.
    Offline,
    /// Startup read in flight (or no upsert attempted yet).
    Syncing,
    /// Last remote operation succeeded.
    Online,
    /// Last remote or local-store operation failed; detail retained.
    Error,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Offline => "offline",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Online => "online",
            SyncStatus::Error => "error",
        }
    }
}

/// Drives the one-time startup merge and the debounced upsert schedule.
pub struct SyncEngine {
    remote: Box<dyn RemoteStore>,
    debounce: Debouncer,
    status: SyncStatus,
    last_error: Option<String>,
}

impl SyncEngine {
    pub fn new(remote: Box<dyn RemoteStore>) -> Self {
        Self {
            remote,
            debounce: Debouncer::default(),
            status: SyncStatus::Offline,
            last_error: None,
        }
    }

    /// Engine with a custom quiet period, for tests that drive time manually.
    pub fn with_debounce(remote: Box<dyn RemoteStore>, delay: Duration) -> Self {
        Self {
            debounce: Debouncer::new(delay),
            ..Self::new(remote)
        }
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.remote.enabled()
    }

    pub fn has_pending_upsert(&self) -> bool {
        self.debounce.is_pending()
    }

    /// One-time startup read. With no remote configured the session stays
    /// offline for good; otherwise the fetched row (if any) is merged into
    /// the ledger field by field.
    pub fn startup(&mut self, ledger: &mut Ledger) {
        if !self.remote.enabled() {
            self.status = SyncStatus::Offline;
            info!("remote sync disabled, staying offline");
            return;
        }
        self.status = SyncStatus::Syncing;
        match self.remote.fetch() {
            Ok(Some(snapshot)) => {
                snapshot.apply(ledger);
                info!("merged remote state from startup read");
                self.set_online();
            }
            Ok(None) => {
                info!("no remote row yet, starting fresh");
                self.set_online();
            }
            Err(err) => self.record_remote_failure(err),
        }
    }

    /// Arms (or re-arms) the debounced upsert. Outside an online session
    /// there is nothing to schedule.
    pub fn schedule_upsert(&mut self, now: DateTime<Utc>) {
        if matches!(self.status, SyncStatus::Online | SyncStatus::Syncing) {
            self.debounce.poke(now);
        }
    }

    /// Pushes the current state if the quiet period has elapsed. Called from
    /// the presentation loop.
    pub fn tick(&mut self, ledger: &Ledger, now: DateTime<Utc>) {
        if self.debounce.fire_if_due(now) {
            self.push(ledger, now);
        }
    }

    /// Forces any pending upsert out immediately, for shutdown.
    pub fn flush(&mut self, ledger: &Ledger, now: DateTime<Utc>) {
        if self.debounce.cancel() {
            self.push(ledger, now);
        }
    }

    /// Routes a failed local write into the status surface. The mutation that
    /// triggered the write stands; editing is never interrupted.
    pub fn record_local_failure(&mut self, err: &LedgerError) {
        error!(%err, "local persistence failed");
        self.status = SyncStatus::Error;
        self.last_error = Some(err.to_string());
    }

    fn push(&mut self, ledger: &Ledger, now: DateTime<Utc>) {
        if !matches!(self.status, SyncStatus::Online | SyncStatus::Syncing) {
            return;
        }
        let snapshot = RemoteSnapshot::capture(ledger, now);
        match self.remote.upsert(&snapshot) {
            Ok(()) => self.set_online(),
            Err(err) => self.record_remote_failure(err),
        }
    }

    fn set_online(&mut self) {
        self.status = SyncStatus::Online;
        self.last_error = None;
    }

    fn record_remote_failure(&mut self, err: LedgerError) {
        warn!(%err, "remote sync failed");
        self.status = SyncStatus::Error;
        self.last_error = Some(err.to_string());
    }
}
