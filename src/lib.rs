//! Keyseal - authenticated envelope encryption for per-user API keys.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── keys          # keygen, encrypt, decrypt
//! │   ├── secrets       # set, get, status, rm
//! │   ├── rotate        # Re-encrypt under a new master key
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── codec         # AES-256-GCM secret codec
//!     ├── envelope      # IV || TAG || CIPHERTEXT layout
//!     ├── key           # 32-byte master key
//!     ├── config        # keyseal.toml and environment
//!     ├── private_file  # Atomic 0600 writes
//!     ├── store/        # Record storage backends
//!     │   ├── mod       # Store trait
//!     │   ├── memory    # In-process map
//!     │   └── fs        # TOML file
//!     ├── validation    # User id and API key checks
//!     └── vault/        # Save / reveal / status / remove / rotate
//! ```
//!
//! # Example
//!
//! ```
//! use keyseal::core::codec::SecretCodec;
//! use keyseal::core::key::MasterKey;
//!
//! let codec = SecretCodec::new(MasterKey::generate());
//! let sealed = codec.encrypt("sk-abc123").unwrap();
//! assert_eq!(codec.decrypt(&sealed).unwrap(), "sk-abc123");
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::codec::{decrypt, encrypt, SecretCodec};
pub use crate::core::key::MasterKey;
pub use crate::error::{Error, ErrorKind, Result};
