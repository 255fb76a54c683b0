//! Ledger domain models and the derived-metrics read surface.

pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod metrics;
pub mod payment;

pub use category::{Category, CategoryDraft, CategoryEdit};
pub use ledger::{
    ledger_warnings, Ledger, DEFAULT_MONTHLY_INCOME, DEFAULT_MONTHLY_SAVINGS,
};
pub use metrics::{unattributed_paid, CategoryStatus, LedgerMetrics, PayoffProjection};
pub use payment::{Payment, PaymentDraft};
