//! Serialized envelope layout.
//!
//! ```text
//! hex( IV (16 bytes) || TAG (16 bytes) || CIPHERTEXT (len(plaintext) bytes) )
//! ```
//!
//! Parsing only checks structure. Whether the bytes are authentic is decided
//! by the codec when it verifies the tag.

use crate::core::constants::{ENVELOPE_HEADER_LEN, IV_LEN, TAG_LEN};
use crate::error::{FormatError, Result};

/// The three fields of one encrypted secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub iv: [u8; IV_LEN],
    pub tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Decode a hex-serialized envelope.
    ///
    /// # Errors
    ///
    /// `FormatError::InvalidHex` for malformed hex (including odd length),
    /// `FormatError::TooShort` when fewer than 32 bytes decode.
    pub fn parse(serialized: &str) -> Result<Self> {
        let bytes = hex::decode(serialized.trim()).map_err(FormatError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }

    /// Split raw envelope bytes into IV, tag and ciphertext.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < ENVELOPE_HEADER_LEN {
            return Err(FormatError::TooShort {
                len: bytes.len(),
                min: ENVELOPE_HEADER_LEN,
            }
            .into());
        }

        let (iv, rest) = bytes.split_at(IV_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        let mut envelope = Self {
            iv: [0u8; IV_LEN],
            tag: [0u8; TAG_LEN],
            ciphertext: ciphertext.to_vec(),
        };
        envelope.iv.copy_from_slice(iv);
        envelope.tag.copy_from_slice(tag);
        Ok(envelope)
    }

    /// Concatenate the fields in `IV || TAG || CIPHERTEXT` order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Lowercase hex string for storage.
    pub fn seal(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Decoded length in bytes.
    pub fn len(&self) -> usize {
        ENVELOPE_HEADER_LEN + self.ciphertext.len()
    }

    /// True when the envelope carries an empty ciphertext.
    pub fn is_empty(&self) -> bool {
        self.ciphertext.is_empty()
    }
}
