//! Key rotation command.
//!
//! Re-encrypt every stored API key under a new master key.

use tracing::info;

use crate::cli::output;
use crate::core::codec::SecretCodec;
use crate::core::config::Config;
use crate::core::constants::MASTER_KEY_ENV;
use crate::core::key::MasterKey;
use crate::core::vault::KeyVault;
use crate::error::Result;

/// Rotate to `new_key`, optionally recording it in keyseal.toml.
pub fn execute(config: &Config, new_key: &str, save: bool, json: bool) -> Result<()> {
    let mut vault = KeyVault::open(config)?;
    let new_codec = SecretCodec::new(MasterKey::parse(new_key)?);
    let new_id = new_codec.key_id();

    let report = vault.rotate(new_codec)?;

    if save {
        save_key(config, new_key)?;
        info!(key_id = %new_id, "new master key saved");
    }

    if json {
        let output = serde_json::json!({
            "key_id": new_id,
            "saved": save,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::success(&format!(
        "rotated {} key{} to master key {}",
        report.rotated.len(),
        if report.rotated.len() == 1 { "" } else { "s" },
        new_id
    ));
    if !report.skipped.is_empty() {
        output::dimmed(&format!(
            "{} already on the new key",
            report.skipped.len()
        ));
    }
    for user in &report.unreadable {
        output::warn(&format!(
            "could not open key for {}, left unchanged",
            output::user(user)
        ));
    }

    if save {
        output::success(&format!(
            "master key written to {}",
            config.config_path().display()
        ));
        if std::env::var_os(MASTER_KEY_ENV).is_some() {
            output::warn(&format!(
                "{} is set and takes precedence; update it too",
                MASTER_KEY_ENV
            ));
        }
    } else {
        output::hint(&format!(
            "now set {} (or [codec] master_key) to the new key",
            MASTER_KEY_ENV
        ));
    }

    Ok(())
}

/// Replace `[codec] master_key` in the file, leaving other settings as loaded
/// from disk rather than from the environment.
fn save_key(config: &Config, new_key: &str) -> Result<()> {
    let mut on_disk = Config::load_from(config.home())?;
    on_disk.codec.master_key = Some(new_key.trim().to_string());
    on_disk.save()
}
