//! Input validation for vault operations.
//!
//! Validates user ids and submitted API keys before anything is encrypted.

use crate::core::constants::{MAX_API_KEY_LEN, MAX_USER_ID_LEN};
use crate::error::{Result, ValidationError};

/// Validate a user id.
///
/// User ids are opaque identifiers from the auth provider (UUIDs, emails):
/// - Cannot be empty
/// - At most 128 characters
/// - Only ASCII letters, digits, and `-`, `_`, `.`, `@`
///
/// # Errors
///
/// Returns `ValidationError` if the id is invalid.
pub fn validate_user_id(user: &str) -> Result<()> {
    if user.is_empty() {
        return Err(ValidationError::EmptyUserId.into());
    }

    if user.chars().count() > MAX_USER_ID_LEN {
        return Err(ValidationError::InvalidUserId {
            user: user.chars().take(16).collect::<String>() + "...",
            reason: format!("longer than {} characters", MAX_USER_ID_LEN),
        }
        .into());
    }

    for (i, ch) in user.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && !matches!(ch, '-' | '_' | '.' | '@') {
            return Err(ValidationError::InvalidUserId {
                user: user.to_string(),
                reason: format!("invalid character '{}' at position {}", ch, i + 1),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate a submitted API key.
///
/// The codec accepts any string; this is where empty and malformed keys
/// are turned away.
///
/// # Errors
///
/// `ValidationError::EmptyApiKey` for empty or whitespace-only input,
/// `ValidationError::InvalidApiKey` for embedded whitespace or control
/// characters, or input longer than 512 bytes.
pub fn validate_api_key(api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        return Err(ValidationError::EmptyApiKey.into());
    }

    if api_key.len() > MAX_API_KEY_LEN {
        return Err(ValidationError::InvalidApiKey(format!(
            "longer than {} bytes",
            MAX_API_KEY_LEN
        ))
        .into());
    }

    if let Some(pos) = api_key
        .chars()
        .position(|c| c.is_whitespace() || c.is_control())
    {
        return Err(ValidationError::InvalidApiKey(format!(
            "whitespace or control character at position {}",
            pos + 1
        ))
        .into());
    }

    Ok(())
}

/// Validate file permissions (Unix only).
///
/// Checks that a file has the expected permissions mode.
#[cfg(unix)]
pub fn validate_file_permissions(path: &std::path::Path, expected_mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let actual_mode = metadata.permissions().mode() & 0o777;

    if actual_mode != expected_mode {
        return Err(ValidationError::InvalidPermissions {
            path: path.display().to_string(),
            expected: format!("{:o}", expected_mode),
            actual: format!("{:o}", actual_mode),
        }
        .into());
    }

    Ok(())
}
