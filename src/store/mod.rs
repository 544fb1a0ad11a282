//! String-keyed persistence and the JSON load/save helpers built on it.
//!
//! Writes are best-effort: a failed save is logged and the in-memory state
//! stays authoritative. Loads never fail; a missing key comes back as
//! `Loaded::Missing` and a value that cannot be read or decoded as
//! `Loaded::Unreadable`, so the caller can fall back to defaults.

mod memory;
mod schema;
mod sqlite;

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Logical names of the per-workbook collections.
pub mod keys {
    pub const TEAM_ROLES: &str = "team_roles";
    pub const ASSETS: &str = "assets";
    pub const SHOTS: &str = "shots";
    pub const PRODUCTION: &str = "production";
    pub const SCENARIOS: &str = "scenarios";
    pub const ACTIVE_SCENARIO: &str = "active_scenario";

    pub const WORKBOOK_COLLECTIONS: &[&str] = &[
        TEAM_ROLES,
        ASSETS,
        SHOTS,
        PRODUCTION,
        SCENARIOS,
        ACTIVE_SCENARIO,
    ];

    pub const BUDGET_TABS: &str = "budget_tabs";
    pub const PROJECT_DATA: &str = "project_data";

    /// `<logical>_<workbook_id>`
    pub fn workbook_key(logical: &str, workbook_id: &str) -> String {
        format!("{logical}_{workbook_id}")
    }
}

/// Result of reading one JSON value from the store.
#[derive(Debug)]
pub enum Loaded<T> {
    Value(T),
    Missing,
    /// Present but unreadable. Logged already.
    Unreadable,
}

impl<T> Loaded<T> {
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing | Self::Unreadable => None,
        }
    }
}

pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Loaded<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Loaded::Missing,
        Err(e) => {
            log::warn!("Failed to read '{key}' from store: {e:#}");
            return Loaded::Unreadable;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(v) => {
            log::debug!("Loaded '{key}'");
            Loaded::Value(v)
        }
        Err(e) => {
            log::warn!("Stored value for '{key}' is not valid: {e}. Using defaults.");
            Loaded::Unreadable
        }
    }
}

/// Serialize and write. Failures are logged and swallowed.
pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Failed to serialize '{key}': {e}");
            return;
        }
    };
    match store.set(key, &json) {
        Ok(()) => log::debug!("Saved '{key}' ({} bytes)", json.len()),
        Err(e) => log::warn!("Failed to save '{key}': {e:#}"),
    }
}

pub fn remove_key(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        log::warn!("Failed to remove '{key}': {e:#}");
    }
}

/// Store whose every operation fails, for exercising the degraded paths.
#[cfg(test)]
pub(crate) struct FailingStore;

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        anyhow::bail!("storage disabled")
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        anyhow::bail!("quota exceeded")
    }

    fn remove(&self, _key: &str) -> Result<()> {
        anyhow::bail!("storage disabled")
    }

    fn clear(&self) -> Result<()> {
        anyhow::bail!("storage disabled")
    }
}
