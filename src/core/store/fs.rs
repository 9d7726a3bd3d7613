//! Filesystem-based store.
//!
//! Keeps every record in a single TOML file (`~/.keyseal/secrets.toml` by
//! default), rewritten atomically on each change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Store, StoredSecret};
use crate::core::private_file;
use crate::error::{Result, StoreError};

/// On-disk layout of the secrets file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    secrets: BTreeMap<String, StoredSecret>,
}

/// TOML-file store.
#[derive(Debug, Clone)]
pub struct Filesystem {
    path: PathBuf,
}

impl Filesystem {
    /// Store backed by the file at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the secrets file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }

        #[cfg(unix)]
        {
            if let Err(e) = crate::core::validation::validate_file_permissions(
                &self.path,
                private_file::PRIVATE_MODE,
            ) {
                warn!("{}", e);
            }
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.display().to_string(),
            source,
        })?;
        let file: StoreFile =
            toml::from_str(&contents).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        debug!(path = %self.path.display(), records = file.secrets.len(), "store read");
        Ok(file)
    }

    fn write(&self, file: &StoreFile) -> Result<()> {
        let contents =
            toml::to_string_pretty(file).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        private_file::write(&self.path, contents.as_bytes()).map_err(|source| {
            StoreError::Write {
                path: self.path.display().to_string(),
                source,
            }
        })?;

        debug!(path = %self.path.display(), records = file.secrets.len(), "store written");
        Ok(())
    }
}

impl Store for Filesystem {
    fn load(&self, user_id: &str) -> Result<Option<StoredSecret>> {
        Ok(self.read()?.secrets.remove(user_id))
    }

    fn upsert(&self, user_id: &str, record: StoredSecret) -> Result<()> {
        let mut file = self.read()?;
        file.secrets.insert(user_id.to_string(), record);
        self.write(&file)
    }

    fn remove(&self, user_id: &str) -> Result<bool> {
        let mut file = self.read()?;
        if file.secrets.remove(user_id).is_none() {
            return Ok(false);
        }
        self.write(&file)?;
        Ok(true)
    }

    fn users(&self) -> Result<Vec<String>> {
        Ok(self.read()?.secrets.into_keys().collect())
    }
}
