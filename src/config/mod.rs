//! Environment-driven configuration: where local state lives and whether a
//! remote mirror is reachable this session.

use std::{env, path::PathBuf};

use dirs::home_dir;
use tracing::info;

use crate::storage::{NoopRemote, RemoteStore, SqliteRemote};

/// Overrides the data directory, mainly for tests and portable installs.
pub const HOME_ENV: &str = "TROUSSEAU_HOME";
/// Locator of the shared remote database.
pub const REMOTE_URL_ENV: &str = "TROUSSEAU_REMOTE_URL";
/// Access key for the remote; checked only for presence and placeholderness.
pub const REMOTE_KEY_ENV: &str = "TROUSSEAU_REMOTE_KEY";

/// Template values shipped in `.env.example`; treated the same as unset.
pub const REMOTE_URL_PLACEHOLDER: &str = "your_remote_url_here";
pub const REMOTE_KEY_PLACEHOLDER: &str = "your_remote_key_here";

const DEFAULT_DIR_NAME: &str = ".trousseau";

/// Returns the application data directory, defaulting to `~/.trousseau`.
pub fn data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Remote credentials as found in the environment. Unset, blank, or
/// placeholder values disable the remote for the whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteSettings {
    url: Option<String>,
    key: Option<String>,
}

impl RemoteSettings {
    pub fn new(url: Option<String>, key: Option<String>) -> Self {
        Self {
            url: normalize(url),
            key: normalize(key),
        }
    }

    pub fn from_env() -> Self {
        Self::new(env::var(REMOTE_URL_ENV).ok(), env::var(REMOTE_KEY_ENV).ok())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled_url().is_some()
    }

    /// The remote locator, if the settings amount to a usable remote.
    pub fn enabled_url(&self) -> Option<&str> {
        let url = self.url.as_deref().filter(|url| *url != REMOTE_URL_PLACEHOLDER)?;
        self.key
            .as_deref()
            .filter(|key| *key != REMOTE_KEY_PLACEHOLDER)?;
        Some(url)
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Builds the remote adapter for the session: the shared SQLite database when
/// the settings are usable, otherwise the no-op stand-in.
pub fn open_remote(settings: &RemoteSettings) -> Box<dyn RemoteStore> {
    match settings.enabled_url() {
        Some(url) => {
            info!(url, "remote sync configured");
            Box::new(SqliteRemote::new(url))
        }
        None => {
            info!("remote sync not configured, running local-only");
            Box::new(NoopRemote)
        }
    }
}
