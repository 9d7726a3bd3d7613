//! API key commands (set, get, status, rm, list).

use dialoguer::Password;
use tracing::info;

use crate::cli::{arg_or_input, output};
use crate::core::config::Config;
use crate::core::store::Store;
use crate::core::vault::{KeyStatus, KeyVault, UnusableReason};
use crate::error::Result;

/// Save an API key for `user`.
pub fn set(config: &Config, user: &str, api_key: Option<String>) -> Result<()> {
    info!("Saving API key for {}", user);

    let vault = KeyVault::open(config)?;
    let api_key = arg_or_input(api_key, || {
        Ok(Password::new()
            .with_prompt(format!("API key for {}", output::user(user)))
            .interact()?)
    })?;

    let replacing = vault.store().contains(user)?;
    vault.save(user, &api_key)?;

    if replacing {
        output::success(&format!("replaced API key for {}", output::user(user)));
    } else {
        output::success(&format!("saved API key for {}", output::user(user)));
    }
    Ok(())
}

/// Print the decrypted API key for `user`.
pub fn get(config: &Config, user: &str) -> Result<()> {
    let vault = KeyVault::open(config)?;
    let api_key = vault.require(user)?;
    println!("{}", api_key.as_str());
    Ok(())
}

/// Show whether `user` has a usable API key.
pub fn status(config: &Config, user: &str, json: bool) -> Result<()> {
    let vault = KeyVault::open(config)?;
    let status = vault.status(user)?;

    if json {
        let output = serde_json::json!({
            "user": user,
            "key_id": vault.codec().key_id(),
            "state": status,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::section("API key");
    output::kv("user", user);
    match &status {
        KeyStatus::Missing => {
            output::kv("status", "missing");
            output::hint(&format!("run: {}", output::cmd("keyseal set")));
        }
        KeyStatus::Configured { updated_at } => {
            output::kv("status", "configured");
            output::kv("updated", updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        KeyStatus::Unusable { reason } => {
            output::kv("status", "unusable");
            output::kv(
                "reason",
                match reason {
                    UnusableReason::KeyMismatch => "sealed under a different master key",
                    UnusableReason::Corrupted => "stored envelope is damaged",
                },
            );
            output::hint(&format!("re-enter it: {}", output::cmd("keyseal set")));
        }
    }
    output::kv("key id", vault.codec().key_id());

    Ok(())
}

/// Remove the API key for `user`.
pub fn rm(config: &Config, user: &str) -> Result<()> {
    let vault = KeyVault::open(config)?;
    if vault.remove(user)? {
        output::success(&format!("removed API key for {}", output::user(user)));
    } else {
        output::warn(&format!("no API key stored for {}", output::user(user)));
    }
    Ok(())
}

/// List users with a stored API key and their status.
pub fn list(config: &Config, json: bool) -> Result<()> {
    let vault = KeyVault::open(config)?;
    let users = vault.store().users()?;

    let mut entries = Vec::with_capacity(users.len());
    for user in &users {
        entries.push((user.as_str(), vault.status(user)?));
    }

    if json {
        let list: Vec<_> = entries
            .iter()
            .map(|(user, status)| serde_json::json!({ "user": user, "state": status }))
            .collect();
        let output = serde_json::json!({
            "users": list,
            "count": list.len(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if entries.is_empty() {
        output::dimmed("no API keys stored");
    } else {
        output::section(&format!("{} stored", entries.len()));
        for (user, status) in entries {
            let label = match status {
                KeyStatus::Missing => "missing",
                KeyStatus::Configured { .. } => "configured",
                KeyStatus::Unusable { .. } => "unusable",
            };
            output::kv(user, label);
        }
    }

    Ok(())
}
