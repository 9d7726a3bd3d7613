//! The storage-access layer for per-user API keys.
//!
//! [`KeyVault`] pairs a [`SecretCodec`] with a [`Store`]: it encrypts before
//! every write, decrypts after every read, and checks each write by reading
//! it back.

mod lifecycle;
mod secrets;

use chrono::{DateTime, Utc};
use serde::Serialize;
use zeroize::Zeroizing;

use crate::core::codec::SecretCodec;
use crate::core::config::Config;
use crate::core::store::{Filesystem, Store, StoredSecret};
use crate::error::Result;

pub use lifecycle::RotationReport;

/// Whether a user has a usable key on file.
///
/// Never carries plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KeyStatus {
    /// Nothing stored for this user.
    Missing,
    /// A key is stored and opens under the current master key.
    Configured { updated_at: DateTime<Utc> },
    /// A record exists but cannot be decrypted; the user must re-enter it.
    Unusable { reason: UnusableReason },
}

/// Why a stored record cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnusableReason {
    /// Sealed under a different master key.
    KeyMismatch,
    /// Envelope is malformed or fails authentication.
    Corrupted,
}

impl KeyStatus {
    /// True only for [`KeyStatus::Configured`].
    pub fn is_configured(&self) -> bool {
        matches!(self, KeyStatus::Configured { .. })
    }
}

/// Encrypted API key storage keyed by user id.
pub struct KeyVault<S: Store> {
    store: S,
    codec: SecretCodec,
    bind_user_id: bool,
}

impl<S: Store> std::fmt::Debug for KeyVault<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyVault")
            .field("key_id", &self.codec.key_id())
            .field("bind_user_id", &self.bind_user_id)
            .finish()
    }
}

impl<S: Store> KeyVault<S> {
    /// Create a vault over `store` using `codec` for every record.
    pub fn new(store: S, codec: SecretCodec) -> Self {
        Self {
            store,
            codec,
            bind_user_id: false,
        }
    }

    /// Bind the owning user id into new envelopes as associated data.
    ///
    /// Existing records keep the mode they were written with.
    pub fn bind_user_id(mut self, bind: bool) -> Self {
        self.bind_user_id = bind;
        self
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Codec in use.
    pub fn codec(&self) -> &SecretCodec {
        &self.codec
    }

    /// Seal `api_key` for `user_id`, binding the user id when `bound`.
    fn seal_for(
        codec: &SecretCodec,
        user_id: &str,
        api_key: &str,
        bound: bool,
    ) -> Result<StoredSecret> {
        let envelope = if bound {
            codec.encrypt_bound(api_key, user_id)?
        } else {
            codec.encrypt(api_key)?
        };

        Ok(StoredSecret {
            envelope,
            key_id: codec.key_id(),
            bound,
            updated_at: Utc::now(),
        })
    }
}

impl KeyVault<Filesystem> {
    /// Open the file-backed vault described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no valid master key is configured.
    pub fn open(config: &Config) -> Result<Self> {
        let codec = config.codec()?;
        let store = Filesystem::new(config.store_path());
        Ok(Self::new(store, codec).bind_user_id(config.codec.bind_user_id))
    }
}

/// Decrypt a stored record with `codec`, honoring its binding mode.
fn open_record(codec: &SecretCodec, user_id: &str, record: &StoredSecret) -> Result<Zeroizing<String>> {
    let plaintext = if record.bound {
        codec.decrypt_bound(&record.envelope, user_id)?
    } else {
        codec.decrypt(&record.envelope)?
    };
    Ok(Zeroizing::new(plaintext))
}
