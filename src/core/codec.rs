//! Secret envelope codec.
//!
//! AES-256-GCM with a 16-byte random IV per call and a 16-byte tag. The
//! output of [`SecretCodec::encrypt`] is `hex(IV || TAG || CIPHERTEXT)`;
//! see [`Envelope`] for the layout.
//!
//! Two entry points:
//!
//! - [`SecretCodec`] holds an already-validated [`MasterKey`].
//! - [`encrypt`] / [`decrypt`] take raw key bytes and validate them on every
//!   call, so a missing or short key surfaces as `ConfigError` before any
//!   cryptographic work happens.
//!
//! Both are stateless apart from the key and safe to share across threads.

use aes_gcm::{
    aead::{consts::U16, AeadInPlace, KeyInit},
    aes::Aes256,
    AesGcm, Nonce, Tag,
};
use rand::{rngs::OsRng, RngCore};
use tracing::debug;
use zeroize::Zeroize;

use crate::core::constants::{IV_LEN, TAG_LEN};
use crate::core::envelope::Envelope;
use crate::core::key::MasterKey;
use crate::error::{Error, FormatError, Result};

/// AES-256-GCM with a 128-bit nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Encrypts and decrypts secrets under one master key.
#[derive(Debug, Clone)]
pub struct SecretCodec {
    key: MasterKey,
}

impl SecretCodec {
    /// Create a codec for a validated master key.
    pub fn new(key: MasterKey) -> Self {
        Self { key }
    }

    /// Fingerprint of the master key in use.
    pub fn key_id(&self) -> String {
        self.key.fingerprint()
    }

    /// The master key.
    pub fn key(&self) -> &MasterKey {
        &self.key
    }

    /// Encrypt a secret into a serialized envelope.
    ///
    /// Never deterministic: every call draws a fresh IV.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encryption` only if the cipher rejects the input
    /// (plaintext beyond the GCM length limit).
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        Ok(self.seal(plaintext.as_bytes(), &[])?.seal())
    }

    /// Decrypt a serialized envelope back to the original secret.
    ///
    /// # Errors
    ///
    /// `Error::Format` for malformed or truncated input (or non-UTF-8
    /// plaintext), `Error::Integrity` when the tag does not verify.
    pub fn decrypt(&self, serialized: &str) -> Result<String> {
        let envelope = Envelope::parse(serialized)?;
        into_utf8(self.open(envelope, &[])?)
    }

    /// Encrypt with `context` bound in as associated data.
    ///
    /// The envelope only opens through [`decrypt_bound`](Self::decrypt_bound)
    /// with the same context.
    pub fn encrypt_bound(&self, plaintext: &str, context: &str) -> Result<String> {
        Ok(self.seal(plaintext.as_bytes(), context.as_bytes())?.seal())
    }

    /// Decrypt an envelope produced by [`encrypt_bound`](Self::encrypt_bound).
    pub fn decrypt_bound(&self, serialized: &str, context: &str) -> Result<String> {
        let envelope = Envelope::parse(serialized)?;
        into_utf8(self.open(envelope, context.as_bytes())?)
    }

    /// Encrypt raw bytes into an [`Envelope`].
    pub fn seal(&self, plaintext: &[u8], aad: &[u8]) -> Result<Envelope> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let mut buffer = plaintext.to_vec();
        let tag = self
            .cipher()
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), aad, &mut buffer)
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let mut envelope = Envelope {
            iv,
            tag: [0u8; TAG_LEN],
            ciphertext: buffer,
        };
        envelope.tag.copy_from_slice(tag.as_slice());

        debug!(len = plaintext.len(), bound = !aad.is_empty(), "sealed secret");
        Ok(envelope)
    }

    /// Verify and decrypt an [`Envelope`], returning the plaintext bytes.
    pub fn open(&self, envelope: Envelope, aad: &[u8]) -> Result<Vec<u8>> {
        let Envelope {
            iv,
            tag,
            ciphertext: mut buffer,
        } = envelope;

        match self.cipher().decrypt_in_place_detached(
            Nonce::<U16>::from_slice(&iv),
            aad,
            &mut buffer,
            Tag::<U16>::from_slice(&tag),
        ) {
            Ok(()) => {
                debug!(len = buffer.len(), "opened secret");
                Ok(buffer)
            }
            Err(_) => {
                buffer.zeroize();
                Err(Error::Integrity)
            }
        }
    }

    fn cipher(&self) -> Aes256Gcm16 {
        Aes256Gcm16::new(self.key.as_bytes().into())
    }
}

fn into_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| {
        e.into_bytes().zeroize();
        FormatError::InvalidUtf8.into()
    })
}

/// Encrypt `plaintext` under raw key bytes.
///
/// # Errors
///
/// `ConfigError::MissingKey` when `key` is empty,
/// `ConfigError::InvalidKeyLength` when it is not 32 bytes.
pub fn encrypt(key: &[u8], plaintext: &str) -> Result<String> {
    SecretCodec::new(MasterKey::from_bytes(key)?).encrypt(plaintext)
}

/// Decrypt a serialized envelope under raw key bytes.
///
/// # Errors
///
/// Configuration errors as for [`encrypt`], then `Error::Format` or
/// `Error::Integrity` as for [`SecretCodec::decrypt`].
pub fn decrypt(key: &[u8], serialized: &str) -> Result<String> {
    SecretCodec::new(MasterKey::from_bytes(key)?).decrypt(serialized)
}
