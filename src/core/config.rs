//! Configuration file management.
//!
//! Reads `keyseal.toml` from the keyseal home directory and applies
//! environment overrides. The master key is resolved here, once, and handed
//! to the codec; nothing downstream reads the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::codec::SecretCodec;
use crate::core::constants;
use crate::core::key::MasterKey;
use crate::core::private_file;
#[cfg(unix)]
use crate::core::validation::validate_file_permissions;
use crate::error::{ConfigError, Result};

/// Contents of `keyseal.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory the config was loaded from.
    #[serde(skip)]
    home: PathBuf,
    /// Codec settings
    #[serde(default)]
    pub codec: CodecConfig,
    /// Store settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// `[codec]` section.
#[derive(Default, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Master key in hex or `base64:` form. `KEYSEAL_MASTER_KEY` takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_key: Option<String>,
    /// Bind the owning user id into each envelope as associated data.
    #[serde(default)]
    pub bind_user_id: bool,
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("master_key", &self.master_key.as_ref().map(|_| "<redacted>"))
            .field("bind_user_id", &self.bind_user_id)
            .finish()
    }
}

/// `[store]` section.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Secrets file. Defaults to `<home>/secrets.toml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Config {
    /// Resolve the keyseal home directory.
    ///
    /// Order: explicit argument, `KEYSEAL_HOME`, then `~/.keyseal`.
    pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = explicit {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = std::env::var_os(constants::HOME_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(constants::HOME_DIR))
    }

    /// Load configuration for the process: file, then environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is unreadable or invalid, or if a
    /// configured master key is malformed.
    pub fn load(home: Option<&Path>) -> Result<Self> {
        let home = Self::resolve_home(home)?;
        let mut config = Self::load_from(&home)?;
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load `keyseal.toml` from `home` without consulting the environment.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from(home: &Path) -> Result<Self> {
        let path = home.join(constants::CONFIG_FILE);
        debug!(path = %path.display(), "loading config");

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
            toml::from_str::<Self>(&contents).map_err(ConfigError::Parse)?
        } else {
            debug!("no config file, using defaults");
            Self::default()
        };
        config.home = home.to_path_buf();

        #[cfg(unix)]
        {
            if config.codec.master_key.is_some() {
                if let Err(e) = validate_file_permissions(&path, private_file::PRIVATE_MODE) {
                    warn!("{}", e);
                }
            }
        }

        debug!(
            master_key = config.codec.master_key.is_some(),
            bind_user_id = config.codec.bind_user_id,
            "config loaded"
        );
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(constants::MASTER_KEY_ENV) {
            debug!("master key taken from {}", constants::MASTER_KEY_ENV);
            self.codec.master_key = Some(key);
        }
    }

    /// Write the configuration to `<home>/keyseal.toml`, mode 0600.
    pub fn save(&self) -> Result<()> {
        debug!(path = %self.config_path().display(), "saving config");
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        private_file::write(&self.config_path(), contents.as_bytes())?;
        Ok(())
    }

    /// Check the loaded values.
    ///
    /// A master key, if present, must decode to exactly 32 bytes. The store
    /// path, if set, must not be empty.
    pub fn validate(&self) -> Result<()> {
        if self.codec.master_key.is_some() {
            self.master_key()?;
        }
        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "store.path",
                    reason: "path cannot be empty".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// The configured master key.
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingKey` when none is configured, otherwise the
    /// parse errors of [`MasterKey::parse`].
    pub fn master_key(&self) -> Result<MasterKey> {
        match &self.codec.master_key {
            Some(encoded) => MasterKey::parse(encoded),
            None => Err(ConfigError::MissingKey.into()),
        }
    }

    /// Codec built from the configured master key.
    pub fn codec(&self) -> Result<SecretCodec> {
        Ok(SecretCodec::new(self.master_key()?))
    }

    /// Home directory this configuration belongs to.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Path of `keyseal.toml`.
    pub fn config_path(&self) -> PathBuf {
        self.home.join(constants::CONFIG_FILE)
    }

    /// Path of the secrets store file.
    ///
    /// Relative paths are resolved against the home directory.
    pub fn store_path(&self) -> PathBuf {
        match &self.store.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.home.join(path),
            None => self.home.join(constants::STORE_FILE),
        }
    }
}
