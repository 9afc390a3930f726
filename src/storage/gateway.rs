use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{SharedStore, StorageError};

/// Whole-collection persistence for one fixed key.
///
/// `load` and `save` never fail from the caller's point of view: a missing
/// or corrupt blob loads as an empty collection and a failed write is only
/// logged, leaving the in-memory state authoritative for the session.
pub struct Gateway<T> {
    store: SharedStore,
    key: &'static str,
    _records: PhantomData<fn() -> T>,
}

impl<T> Gateway<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: SharedStore, key: &'static str) -> Self {
        Self {
            store,
            key,
            _records: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn load(&self) -> Vec<T> {
        match self.try_load() {
            Ok(Some(records)) => {
                tracing::debug!(key = self.key, count = records.len(), "loaded collection");
                records
            }
            Ok(None) => {
                tracing::debug!(key = self.key, "no saved collection, starting empty");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(key = self.key, error = %err, "discarding unreadable collection");
                Vec::new()
            }
        }
    }

    pub fn save(&self, records: &[T]) {
        match self.try_save(records) {
            Ok(()) => tracing::debug!(key = self.key, count = records.len(), "saved collection"),
            Err(err) => tracing::warn!(key = self.key, error = %err, "failed to save collection"),
        }
    }

    pub fn try_load(&self) -> Result<Option<Vec<T>>, StorageError> {
        let Some(blob) = self.store.read(self.key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&blob)?))
    }

    pub fn try_save(&self, records: &[T]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(records)?;
        self.store.write(self.key, &blob)
    }
}
