//! Test support utilities for keyseal integration tests.
//!
//! Provides an isolated keyseal home per test and helper commands.

#![allow(dead_code)]

pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with an isolated home directory.
///
/// No process-global state is mutated; child processes get `HOME` and the
/// keyseal variables explicitly, so tests can run in parallel.
pub struct Test {
    /// Temporary home directory
    pub home: TempDir,
    /// Master key passed via KEYSEAL_MASTER_KEY, if any
    pub master_key: Option<String>,
}

impl Test {
    /// Environment with no master key configured.
    pub fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        Self {
            home,
            master_key: None,
        }
    }

    /// Environment with `MASTER_KEY_A` in the environment.
    pub fn with_key() -> Self {
        Self::with_master_key(MASTER_KEY_A)
    }

    /// Environment with the given master key in the environment.
    pub fn with_master_key(key: &str) -> Self {
        let mut t = Self::new();
        t.master_key = Some(key.to_string());
        t
    }

    /// The keyseal home inside the temp directory.
    pub fn keyseal_home(&self) -> PathBuf {
        self.home.path().join(".keyseal")
    }

    /// Path of the secrets store file.
    pub fn store_path(&self) -> PathBuf {
        self.keyseal_home().join("secrets.toml")
    }
}
