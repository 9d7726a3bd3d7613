//! Constants used throughout keyseal.
//!
//! Centralizes envelope sizes, file names and environment variables.

/// Master key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Initialization vector length in bytes.
pub const IV_LEN: usize = 16;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Smallest valid decoded envelope (IV + tag, empty ciphertext).
pub const ENVELOPE_HEADER_LEN: usize = IV_LEN + TAG_LEN;

/// Prefix marking a base64-encoded master key.
pub const BASE64_KEY_PREFIX: &str = "base64:";

/// Configuration directory relative to HOME (~/.keyseal).
pub const HOME_DIR: &str = ".keyseal";

/// Configuration file name inside the keyseal home.
pub const CONFIG_FILE: &str = "keyseal.toml";

/// Default secrets store file name inside the keyseal home.
pub const STORE_FILE: &str = "secrets.toml";

/// Environment variable holding the master key.
pub const MASTER_KEY_ENV: &str = "KEYSEAL_MASTER_KEY";

/// Environment variable overriding the keyseal home directory.
pub const HOME_ENV: &str = "KEYSEAL_HOME";

/// Environment variable for the log filter.
pub const LOG_ENV: &str = "KEYSEAL_LOG";

/// Longest accepted user id, in characters.
pub const MAX_USER_ID_LEN: usize = 128;

/// Longest accepted API key, in bytes.
pub const MAX_API_KEY_LEN: usize = 512;
