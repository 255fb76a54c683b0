use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for ledger, storage, and sync layers.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Remote read failed: {0}")]
    RemoteRead(String),
    #[error("Remote write failed: {0}")]
    RemoteWrite(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = StdResult<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
