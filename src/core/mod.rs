//! Core library components.
//!
//! The envelope codec, its master key, configuration, and the vault that
//! stores encrypted API keys per user.

pub mod codec;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod key;
pub mod private_file;
pub mod store;
pub mod validation;
pub mod vault;
