//! Error types for keyseal.
//!
//! Each concern has its own error enum; [`Error`] wraps them so library
//! callers can match on the category through [`Error::kind`].

use thiserror::Error;

/// Configuration errors: the master key or the config file is unusable.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no master key configured: set KEYSEAL_MASTER_KEY or [codec] master_key")]
    MissingKey,

    #[error("master key must be exactly 32 bytes, got {actual}")]
    InvalidKeyLength { actual: usize },

    #[error("master key is not valid {encoding}")]
    InvalidKeyEncoding { encoding: &'static str },

    #[error("unable to determine home directory")]
    NoHomeDir,

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Serialized envelope is structurally unusable.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("envelope is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("envelope too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    #[error("decrypted secret is not valid UTF-8")]
    InvalidUtf8,
}

/// Storage backend errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file is corrupt: {0}")]
    Corrupt(String),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("stored key for {user} did not match after write")]
    VerifyFailed { user: String },

    #[error("no API key stored for {0}")]
    NotFound(String),
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("user id cannot be empty")]
    EmptyUserId,

    #[error("invalid user id '{user}': {reason}")]
    InvalidUserId { user: String, reason: String },

    #[error("API key cannot be empty")]
    EmptyApiKey,

    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("invalid permissions on {path}: expected {expected}, got {actual}")]
    InvalidPermissions {
        path: String,
        expected: String,
        actual: String,
    },
}

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("integrity check failed: envelope was altered or sealed under a different key")]
    Integrity,

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Format,
    Integrity,
    Validation,
    Store,
    Io,
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Configuration,
            Error::Format(_) => ErrorKind::Format,
            Error::Integrity => ErrorKind::Integrity,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Store(_) | Error::Json(_) => ErrorKind::Store,
            Error::Encryption(_) | Error::Io(_) | Error::Prompt(_) => ErrorKind::Io,
        }
    }

    /// Message safe to show an end user.
    ///
    /// Configuration failures never describe key state, and cryptographic
    /// failures on read collapse to "re-enter your key".
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Configuration => "service unavailable".to_string(),
            ErrorKind::Format | ErrorKind::Integrity => {
                "no usable API key stored, please re-enter it".to_string()
            }
            ErrorKind::Validation => self.to_string(),
            ErrorKind::Store | ErrorKind::Io => "failed to access stored API key".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
