//! Master key rotation.

use serde::Serialize;
use tracing::{info, warn};

use super::{open_record, KeyVault};
use crate::core::codec::SecretCodec;
use crate::core::store::Store;
use crate::error::{Error, Result};

/// Outcome of [`KeyVault::rotate`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RotationReport {
    /// Users whose key was re-sealed under the new master key.
    pub rotated: Vec<String>,
    /// Users already sealed under the new master key.
    pub skipped: Vec<String>,
    /// Users whose record could not be opened under the old key; left as is.
    pub unreadable: Vec<String>,
}

impl<S: Store> KeyVault<S> {
    /// Re-encrypt every stored key under `new_codec`, then switch to it.
    ///
    /// Each record is opened with the current codec and sealed again with a
    /// fresh IV, keeping the binding mode it was written with. Records already carrying the new key id are skipped, so an
    /// interrupted rotation can be re-run. Records that fail to open are
    /// reported and left untouched.
    ///
    /// # Errors
    ///
    /// Store and configuration errors abort the rotation; records rotated
    /// before the failure stay rotated.
    pub fn rotate(&mut self, new_codec: SecretCodec) -> Result<RotationReport> {
        let new_id = new_codec.key_id();
        let mut report = RotationReport::default();

        for user in self.store.users()? {
            let Some(record) = self.store.load(&user)? else {
                continue;
            };

            if record.key_id == new_id {
                report.skipped.push(user);
                continue;
            }

            let plaintext = match open_record(&self.codec, &user, &record) {
                Ok(plaintext) => plaintext,
                Err(e @ (Error::Integrity | Error::Format(_))) => {
                    warn!(user = %user, error = %e, "cannot rotate unreadable record");
                    report.unreadable.push(user);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let resealed = Self::seal_for(&new_codec, &user, &plaintext, record.bound)?;
            self.store.upsert(&user, resealed)?;
            report.rotated.push(user);
        }

        info!(
            from = %self.codec.key_id(),
            to = %new_id,
            rotated = report.rotated.len(),
            skipped = report.skipped.len(),
            unreadable = report.unreadable.len(),
            "master key rotated"
        );

        self.codec = new_codec;
        Ok(report)
    }
}
