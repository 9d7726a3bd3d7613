//! Master key and raw codec commands (keygen, encrypt, decrypt).

use std::path::Path;

use tracing::info;
use zeroize::Zeroizing;

use crate::cli::{arg_or_input, output};
use crate::core::config::Config;
use crate::core::constants::MASTER_KEY_ENV;
use crate::core::key::MasterKey;
use crate::error::{ConfigError, Result};

/// Generate a master key, print it, and optionally save it to keyseal.toml.
pub fn keygen(home: Option<&Path>, base64: bool, save: bool, force: bool) -> Result<()> {
    let key = MasterKey::generate();
    let encoded = if base64 { key.to_base64() } else { key.to_hex() };

    if !save {
        println!("{}", encoded.as_str());
        return Ok(());
    }

    let home = Config::resolve_home(home)?;
    let mut config = Config::load_from(&home)?;
    if config.codec.master_key.is_some() && !force {
        return Err(ConfigError::InvalidValue {
            field: "codec.master_key",
            reason: "already set (use --force to overwrite)".to_string(),
        }
        .into());
    }

    config.codec.master_key = Some(encoded.to_string());
    config.save()?;
    info!(key_id = %key.fingerprint(), "master key saved");

    output::success(&format!(
        "master key {} written to {}",
        key.fingerprint(),
        config.config_path().display()
    ));
    if std::env::var_os(MASTER_KEY_ENV).is_some() {
        output::warn(&format!("{} is set and takes precedence", MASTER_KEY_ENV));
    }
    Ok(())
}

/// Encrypt a plaintext with the configured master key and print the envelope.
pub fn encrypt(config: &Config, plaintext: Option<String>) -> Result<()> {
    let codec = config.codec()?;
    let plaintext = arg_or_input(plaintext, || {
        Ok(dialoguer::Password::new()
            .with_prompt("Plaintext")
            .allow_empty_password(true)
            .interact()?)
    })?;
    println!("{}", codec.encrypt(&plaintext)?);
    Ok(())
}

/// Decrypt an envelope with the configured master key and print the plaintext.
pub fn decrypt(config: &Config, envelope: Option<String>) -> Result<()> {
    let codec = config.codec()?;
    let envelope = arg_or_input(envelope, || {
        Ok(dialoguer::Input::<String>::new()
            .with_prompt("Envelope")
            .interact_text()?)
    })?;
    let plaintext = Zeroizing::new(codec.decrypt(&envelope)?);
    println!("{}", plaintext.as_str());
    Ok(())
}
