use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::domain::error::DomainError;

/// Port for the domain layer: string-keyed local persistence.
///
/// Writes are synchronous; once `set` returns the value is durable and
/// visible to every later `get`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    /// Returns true if a value was removed.
    fn remove(&self, key: &str) -> anyhow::Result<bool>;
}

/// Logical persisted entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKey {
    CurrentUser,
    Jobs,
    Messages,
    /// Per-user profile, keyed by email.
    Profile(String),
}

impl StorageKey {
    pub fn render(&self, prefix: &str) -> String {
        match self {
            StorageKey::CurrentUser => format!("{prefix}:user"),
            StorageKey::Jobs => format!("{prefix}:jobs"),
            StorageKey::Messages => format!("{prefix}:messages"),
            StorageKey::Profile(email) => format!("{prefix}:profile:{email}"),
        }
    }
}

/// Typed JSON snapshots on top of a [`KeyValueStore`].
#[derive(Clone)]
pub struct PersistedStore {
    backend: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl PersistedStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, key: &StorageKey) -> String {
        key.render(&self.prefix)
    }

    /// Absent key => `Ok(None)`; malformed JSON => `DomainError::Storage`.
    #[instrument(name = "marketplace.store.load", skip(self), fields(key = ?key))]
    pub fn load<T: DeserializeOwned>(&self, key: &StorageKey) -> Result<Option<T>, DomainError> {
        let raw_key = self.key(key);
        let Some(raw) = self
            .backend
            .get(&raw_key)
            .map_err(|e| DomainError::storage(e.to_string()))?
        else {
            debug!("no stored value");
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| DomainError::storage(format!("malformed value under '{raw_key}': {e}")))
    }

    /// Decode-or-default boundary: anything unreadable is replaced by `T::default()`.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &StorageKey) -> T {
        self.load_or_else(key, T::default)
    }

    pub fn load_or_else<T, F>(&self, key: &StorageKey, fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.load(key) {
            Ok(Some(v)) => v,
            Ok(None) => fallback(),
            Err(e) => {
                warn!(key = ?key, error = %e, "discarding unreadable stored value");
                fallback()
            }
        }
    }

    /// Serialize the whole snapshot and write it through.
    #[instrument(name = "marketplace.store.save", skip(self, value), fields(key = ?key))]
    pub fn save<T: Serialize + ?Sized>(
        &self,
        key: &StorageKey,
        value: &T,
    ) -> Result<(), DomainError> {
        let raw = serde_json::to_string(value).map_err(|e| DomainError::storage(e.to_string()))?;
        self.backend
            .set(&self.key(key), &raw)
            .map_err(|e| DomainError::storage(e.to_string()))?;
        debug!(bytes = raw.len(), "snapshot written");
        Ok(())
    }

    pub fn remove(&self, key: &StorageKey) -> Result<bool, DomainError> {
        self.backend
            .remove(&self.key(key))
            .map_err(|e| DomainError::storage(e.to_string()))
    }
}
