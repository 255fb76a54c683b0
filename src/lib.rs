#![doc(test(attr(deny(warnings))))]

//! Trousseau keeps a wedding budget ledger: categories, payments, derived
//! metrics, local persistence, and an optional shared remote.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod sync;
pub mod time;
pub mod tracker;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("trousseau=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("Trousseau tracing initialized.");
    });
}
