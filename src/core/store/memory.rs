//! In-process store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{Store, StoredSecret};
use crate::error::{Result, StoreError};

/// Map-backed store, safe to share between threads.
#[derive(Debug, Default)]
pub struct Memory {
    records: RwLock<BTreeMap<String, StoredSecret>>,
}

impl Memory {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len())
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Store for Memory {
    fn load(&self, user_id: &str) -> Result<Option<StoredSecret>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(user_id).cloned())
    }

    fn upsert(&self, user_id: &str, record: StoredSecret) -> Result<()> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(user_id.to_string(), record);
        Ok(())
    }

    fn remove(&self, user_id: &str) -> Result<bool> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        Ok(records.remove(user_id).is_some())
    }

    fn users(&self) -> Result<Vec<String>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.keys().cloned().collect())
    }
}
