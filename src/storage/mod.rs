//! Storage adapters: the local key-value store the ledger always writes
//! through, and the optional remote mirror behind `RemoteStore`.

pub mod local;
pub mod remote;
pub mod sqlite;

pub use local::{load_ledger, save_ledger, FileStore, KeyValueStore, MemoryStore};
pub use remote::{NoopRemote, RemoteSnapshot, RemoteStore};
pub use sqlite::SqliteRemote;
