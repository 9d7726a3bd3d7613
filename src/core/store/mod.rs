//! Encrypted record storage.
//!
//! The vault persists one [`StoredSecret`] per user through a [`Store`]
//! backend. Backends only ever see ciphertext.
//!
//! ## Adding a New Storage Backend
//!
//! 1. Implement the `Store` trait
//! 2. Add the implementation in a new file (e.g., `postgres.rs`)
//! 3. Re-export from this module

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

mod fs;
mod memory;

pub use fs::Filesystem;
pub use memory::Memory;

/// One user's persisted API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSecret {
    /// Serialized envelope, `hex(IV || TAG || CIPHERTEXT)`.
    pub envelope: String,
    /// Fingerprint of the master key that sealed the envelope.
    pub key_id: String,
    /// Whether the user id was bound in as associated data.
    #[serde(default)]
    pub bound: bool,
    /// Last write time.
    pub updated_at: DateTime<Utc>,
}

/// Storage backend keyed by user id.
///
/// Writes replace the whole record; there is no partial update.
pub trait Store {
    /// Fetch the record for `user_id`, if any.
    fn load(&self, user_id: &str) -> Result<Option<StoredSecret>>;

    /// Insert or replace the record for `user_id`.
    fn upsert(&self, user_id: &str, record: StoredSecret) -> Result<()>;

    /// Delete the record for `user_id`. Returns `true` if one existed.
    fn remove(&self, user_id: &str) -> Result<bool>;

    /// All user ids with a stored record, sorted.
    fn users(&self) -> Result<Vec<String>>;

    /// Check whether a record exists for `user_id`.
    fn contains(&self, user_id: &str) -> Result<bool> {
        Ok(self.load(user_id)?.is_some())
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn load(&self, user_id: &str) -> Result<Option<StoredSecret>> {
        (**self).load(user_id)
    }

    fn upsert(&self, user_id: &str, record: StoredSecret) -> Result<()> {
        (**self).upsert(user_id, record)
    }

    fn remove(&self, user_id: &str) -> Result<bool> {
        (**self).remove(user_id)
    }

    fn users(&self) -> Result<Vec<String>> {
        (**self).users()
    }
}
