//! Master key handling.
//!
//! The master key is loaded once at startup and handed to [`SecretCodec`]
//! by value. Key bytes are wiped from memory when the key is dropped.
//!
//! [`SecretCodec`]: crate::core::codec::SecretCodec

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::core::constants::{BASE64_KEY_PREFIX, KEY_LEN};
use crate::error::{ConfigError, Result};

/// A 32-byte AES-256 master key.
#[derive(Clone)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Build a key from raw bytes.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingKey` for an empty slice,
    /// `ConfigError::InvalidKeyLength` for any length other than 32.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ConfigError::MissingKey.into());
        }
        let bytes: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| ConfigError::InvalidKeyLength {
                actual: bytes.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Parse the textual form: 64 hex characters, or `base64:` + base64.
    pub fn parse(encoded: &str) -> Result<Self> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(ConfigError::MissingKey.into());
        }

        let decoded = if let Some(b64) = encoded.strip_prefix(BASE64_KEY_PREFIX) {
            STANDARD
                .decode(b64)
                .map_err(|_| ConfigError::InvalidKeyEncoding { encoding: "base64" })?
        } else {
            hex::decode(encoded).map_err(|_| ConfigError::InvalidKeyEncoding { encoding: "hex" })?
        };
        let decoded = Zeroizing::new(decoded);

        Self::from_bytes(&decoded)
    }

    /// Generate a fresh random key from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Hex form, suitable for `KEYSEAL_MASTER_KEY`.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.bytes))
    }

    /// `base64:`-prefixed form.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("{}{}", BASE64_KEY_PREFIX, STANDARD.encode(self.bytes)))
    }

    /// Short non-secret identifier: first 8 bytes of SHA-256(key), hex.
    ///
    /// Stored next to each record so a key change can be told apart from
    /// tampering.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes);
        hex::encode(&digest[..8])
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

impl PartialEq for MasterKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes[..].ct_eq(&other.bytes[..]).into()
    }
}

impl Eq for MasterKey {}
