//! Caller-level input checks, run before any cryptographic or store call.

use subtle::ConstantTimeEq;

use super::error::{VaultError, VaultResult};
use super::model::SecurePayload;

/// Reject master passwords shorter than `min_length` characters.
///
/// Length is measured in UTF-16 code units, the same way the desktop and
/// mobile clients measure it, so any password they accept is accepted here.
pub fn validate_master_password(password: &str, min_length: usize) -> VaultResult<()> {
    if password.is_empty() {
        return Err(VaultError::Validation("Master password is required".into()));
    }

    if password.encode_utf16().count() < min_length {
        return Err(VaultError::Validation(format!(
            "Password must be at least {} characters",
            min_length
        )));
    }

    Ok(())
}

/// Reject a confirmation that does not match the chosen password.
pub fn validate_confirmation(password: &str, confirmation: &str) -> VaultResult<()> {
    let matches: bool = password.as_bytes().ct_eq(confirmation.as_bytes()).into();
    if !matches {
        return Err(VaultError::Validation("Passwords don't match".into()));
    }
    Ok(())
}

/// Trim a new item's fields and reject empty ones.
pub fn normalize_item(title: &str, content: &str) -> VaultResult<SecurePayload> {
    let title = title.trim();
    let content = content.trim();

    if title.is_empty() {
        return Err(VaultError::Validation("Title is required".into()));
    }
    if content.is_empty() {
        return Err(VaultError::Validation("Content is required".into()));
    }

    Ok(SecurePayload::new(title, content))
}
