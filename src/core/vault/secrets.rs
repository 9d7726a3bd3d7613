//! API key operations.
//!
//! Save, reveal, status and remove for a single user's key.

use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::{open_record, KeyStatus, KeyVault, UnusableReason};
use crate::core::store::{Store, StoredSecret};
use crate::core::validation::{validate_api_key, validate_user_id};
use crate::error::{Error, ErrorKind, Result, StoreError};

impl<S: Store> KeyVault<S> {
    /// Encrypt and store `api_key` for `user_id`, replacing any existing key.
    ///
    /// The record is read back and decrypted after the write; the call only
    /// succeeds if it yields exactly the submitted key.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a bad user id or key,
    /// `StoreError::VerifyFailed` if the read-back does not match.
    pub fn save(&self, user_id: &str, api_key: &str) -> Result<StoredSecret> {
        validate_user_id(user_id)?;
        validate_api_key(api_key)?;

        let record = Self::seal_for(&self.codec, user_id, api_key, self.bind_user_id)?;
        self.store.upsert(user_id, record.clone())?;
        debug!(user = user_id, key_id = %record.key_id, "record written");

        self.verify_write(user_id, api_key, &record)?;

        info!(user = user_id, "API key saved");
        Ok(record)
    }

    fn verify_write(&self, user_id: &str, api_key: &str, written: &StoredSecret) -> Result<()> {
        let verify_failed = || StoreError::VerifyFailed {
            user: user_id.to_string(),
        };

        let stored = self.store.load(user_id)?.ok_or_else(verify_failed)?;
        if stored.envelope != written.envelope {
            warn!(user = user_id, "read-back envelope differs from written one");
            return Err(verify_failed().into());
        }

        let roundtrip = match open_record(&self.codec, user_id, &stored) {
            Ok(plaintext) => plaintext,
            Err(e) if matches!(e.kind(), ErrorKind::Format | ErrorKind::Integrity) => {
                warn!(user = user_id, error = %e, "read-back failed to decrypt");
                return Err(verify_failed().into());
            }
            Err(e) => return Err(e),
        };

        if bool::from(roundtrip.as_bytes().ct_eq(api_key.as_bytes())) {
            Ok(())
        } else {
            warn!(user = user_id, "read-back plaintext differs from submitted key");
            Err(verify_failed().into())
        }
    }

    /// Decrypt the stored key for `user_id`.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// `Error::Integrity` or `Error::Format` when the record exists but
    /// cannot be opened under the current master key.
    pub fn reveal(&self, user_id: &str) -> Result<Option<Zeroizing<String>>> {
        validate_user_id(user_id)?;

        let Some(record) = self.store.load(user_id)? else {
            debug!(user = user_id, "no record");
            return Ok(None);
        };

        if record.key_id != self.codec.key_id() {
            warn!(
                user = user_id,
                stored = %record.key_id,
                current = %self.codec.key_id(),
                "record sealed under a different master key"
            );
        }

        open_record(&self.codec, user_id, &record).map(Some)
    }

    /// Like [`reveal`](Self::reveal), but a missing key is an error.
    pub fn require(&self, user_id: &str) -> Result<Zeroizing<String>> {
        self.reveal(user_id)?
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()).into())
    }

    /// Report whether `user_id` has a usable key, without exposing it.
    pub fn status(&self, user_id: &str) -> Result<KeyStatus> {
        validate_user_id(user_id)?;

        let Some(record) = self.store.load(user_id)? else {
            return Ok(KeyStatus::Missing);
        };

        if record.key_id != self.codec.key_id() {
            warn!(user = user_id, "stored key sealed under a different master key");
            return Ok(KeyStatus::Unusable {
                reason: UnusableReason::KeyMismatch,
            });
        }

        match open_record(&self.codec, user_id, &record) {
            Ok(_) => Ok(KeyStatus::Configured {
                updated_at: record.updated_at,
            }),
            Err(e @ (Error::Integrity | Error::Format(_))) => {
                warn!(user = user_id, error = %e, "stored key is unusable");
                Ok(KeyStatus::Unusable {
                    reason: UnusableReason::Corrupted,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the stored key for `user_id`. Returns `true` if one existed.
    pub fn remove(&self, user_id: &str) -> Result<bool> {
        validate_user_id(user_id)?;
        let removed = self.store.remove(user_id)?;
        if removed {
            info!(user = user_id, "API key removed");
        }
        Ok(removed)
    }
}
