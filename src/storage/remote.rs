//! Remote mirror interface: a single logical row holding the whole ledger,
//! fetched once at startup and replaced wholesale on every upsert.

use chrono::{DateTime, Utc};

use crate::{
    errors::Result,
    ledger::{Category, Ledger, Payment},
};

/// The remote row, field by field. Every field is optional: a fetched row may
/// carry only some columns, and `apply` must leave the rest of the in-memory
/// state untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteSnapshot {
    pub monthly_income: Option<f64>,
    pub monthly_savings: Option<f64>,
    pub balance: Option<f64>,
    pub total_budget: Option<f64>,
    pub categories: Option<Vec<Category>>,
    pub payments: Option<Vec<Payment>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteSnapshot {
    /// Full snapshot of the current state, stamped for last-writer-wins.
    pub fn capture(ledger: &Ledger, updated_at: DateTime<Utc>) -> Self {
        Self {
            monthly_income: Some(ledger.monthly_income),
            monthly_savings: Some(ledger.monthly_savings),
            balance: Some(ledger.balance),
            total_budget: Some(ledger.total_budget),
            categories: Some(ledger.categories.clone()),
            payments: Some(ledger.payments.clone()),
            updated_at: Some(updated_at),
        }
    }

    /// Overwrites exactly the fields present in the snapshot.
    pub fn apply(&self, ledger: &mut Ledger) {
        if let Some(monthly_income) = self.monthly_income {
            ledger.monthly_income = monthly_income;
        }
        if let Some(monthly_savings) = self.monthly_savings {
            ledger.monthly_savings = monthly_savings;
        }
        if let Some(balance) = self.balance {
            ledger.balance = balance;
        }
        if let Some(total_budget) = self.total_budget {
            ledger.total_budget = total_budget;
        }
        if let Some(categories) = &self.categories {
            ledger.categories = categories.clone();
        }
        if let Some(payments) = &self.payments {
            ledger.payments = payments.clone();
        }
    }
}

/// Backing store shared across devices. Errors carry a human-readable detail
/// and are routed to the sync status, never to the editing flow.
pub trait RemoteStore: Send + Sync {
    /// Whether this adapter can reach a real backend at all. Disabled
    /// adapters keep the session offline.
    fn enabled(&self) -> bool {
        true
    }

    /// Reads the single row; `None` when none has been written yet.
    fn fetch(&self) -> Result<Option<RemoteSnapshot>>;

    /// Inserts or replaces the single row.
    fn upsert(&self, snapshot: &RemoteSnapshot) -> Result<()>;
}

/// Stand-in used when remote sync is not configured; keeps call sites free of
/// special cases.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRemote;

impl RemoteStore for NoopRemote {
    fn enabled(&self) -> bool {
        false
    }

    fn fetch(&self) -> Result<Option<RemoteSnapshot>> {
        Ok(None)
    }

    fn upsert(&self, _snapshot: &RemoteSnapshot) -> Result<()> {
        Ok(())
    }
}
