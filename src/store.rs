//! Process-wide environment cache.
//!
//! The cache is rebuilt wholesale from the host environment, never
//! incrementally diffed: [`reload`] snapshots the environment outside the
//! lock and installs it under the write lock as a single map swap.

use std::collections::HashMap;
use std::sync::LazyLock;

use parking_lot::RwLock;
use tracing::debug;

use crate::env;
use crate::error::Error;
use crate::loader::EnvLoader;

/// In-memory cache of environment values behind a reader/writer lock.
///
/// The map only ever holds trimmed values; writers trim on insertion so
/// every read already satisfies the trimming invariant.
#[derive(Debug)]
pub(crate) struct Store {
    map: RwLock<HashMap<String, String>>,
}

impl Store {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self {
            map: RwLock::new(map),
        }
    }

    /// Read a cached value. `None` for unknown keys.
    pub(crate) fn get(&self, key: &str) -> Option<String> {
        self.map.read().get(key).cloned()
    }

    /// Insert or replace a single cached value.
    pub(crate) fn set(&self, key: &str, value: &str) {
        self.map
            .write()
            .insert(key.to_owned(), trim_value(value).to_owned());
    }

    /// Atomically discard the current contents and install `map`.
    pub(crate) fn replace_all(&self, map: HashMap<String, String>) {
        *self.map.write() = map;
    }

    /// Rebuild the cache wholesale from the host environment.
    pub(crate) fn reload(&self) {
        let snapshot = trimmed_snapshot();
        debug!(entries = snapshot.len(), "reloading environment cache");
        self.replace_all(snapshot);
    }
}

/// The process-wide [`Store`] instance.
///
/// First access bootstraps it: the default `.env` file is applied to the
/// host environment with first-wins precedence (a missing file is fine),
/// then the full host environment is copied in.
pub(crate) fn store() -> &'static Store {
    static STORE: LazyLock<Store> = LazyLock::new(bootstrap);
    &STORE
}

fn bootstrap() -> Store {
    match EnvLoader::new().required(false).apply() {
        Ok(report) => debug!(
            loaded = report.loaded,
            skipped = report.skipped_existing,
            "applied default dotenv file at startup"
        ),
        Err(err) => debug!(error = %err, "default dotenv file not applied"),
    }
    Store::new(trimmed_snapshot())
}

fn trimmed_snapshot() -> HashMap<String, String> {
    env::snapshot()
        .into_iter()
        .map(|(key, value)| {
            let trimmed = trim_value(&value).to_owned();
            (key, trimmed)
        })
        .collect()
}

/// Strip leading and trailing ASCII spaces.
pub(crate) fn trim_value(value: &str) -> &str {
    value.trim_matches(' ')
}

/// Cache `key` without touching the host environment.
pub fn set(key: &str, value: &str) {
    store().set(key, value);
}

/// Write `key` through to both the host environment and the cache.
pub fn must_set(key: &str, value: &str) -> Result<(), Error> {
    env::set(key, value)?;
    store().set(key, value);
    Ok(())
}

/// Rebuild the cache from the host environment.
pub fn reload() {
    store().reload();
}
