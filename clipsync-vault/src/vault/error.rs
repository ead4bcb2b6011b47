//! Vault-specific error types for the Secure Vault.
//!
//! Every failure the session can surface to a UI is one of these variants.
//! They serialize as `{ code, message }` so a frontend bridge can branch on
//! the code and show the message.

use thiserror::Error;

use super::state::VaultState;
use crate::error::StoreError;

/// Errors that can occur during vault operations.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Caller-level input problem (password too short, confirmation
    /// mismatch, empty title). Raised before any crypto or store call.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A single item's AES-GCM tag did not verify.
    #[error("Authentication failed")]
    AuthenticationFailure,

    /// A single item could not be decoded: bad base64, bad nonce length,
    /// or a plaintext that is not a `{title, content}` document.
    #[error("Malformed secure item: {0}")]
    MalformedItem(String),

    /// None of a non-empty set of stored items decrypted.
    #[error("Wrong password")]
    WrongPassword,

    /// The operation is not permitted in the session's current state.
    #[error("Cannot {operation} while vault is {state}")]
    InvalidState {
        operation: &'static str,
        state: VaultState,
    },

    /// The vault has not been created yet, or its salt is unknown.
    #[error("Vault not set up")]
    NotSetup,

    /// No decrypted item with this id is held by the session.
    #[error("Secure item not found: {0}")]
    ItemNotFound(String),

    /// The salt (or another base64 field) could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Key derivation failed or its worker task was lost.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// An error occurred in the encryption layer.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// The vault store rejected or failed the call.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl VaultError {
    /// Stable code for programmatic handling on the UI side.
    pub fn code(&self) -> &'static str {
        match self {
            VaultError::Validation(_) => "VALIDATION_ERROR",
            VaultError::AuthenticationFailure => "AUTHENTICATION_FAILURE",
            VaultError::MalformedItem(_) => "MALFORMED_ITEM",
            VaultError::WrongPassword => "WRONG_PASSWORD",
            VaultError::InvalidState { .. } => "INVALID_STATE",
            VaultError::NotSetup => "NOT_SETUP",
            VaultError::ItemNotFound(_) => "ITEM_NOT_FOUND",
            VaultError::Decode(_) => "DECODE_ERROR",
            VaultError::KeyDerivation(_) => "KEY_DERIVATION_ERROR",
            VaultError::Encryption(_) => "ENCRYPTION_ERROR",
            VaultError::Store(_) => "STORE_ERROR",
        }
    }

    /// Whether this is a per-item decryption failure the reconciler absorbs.
    pub fn is_item_failure(&self) -> bool {
        matches!(
            self,
            VaultError::AuthenticationFailure | VaultError::MalformedItem(_)
        )
    }
}

/// Result type alias for vault operations.
pub type VaultResult<T> = std::result::Result<T, VaultError>;

// ============================================================================
// Serialization for the UI bridge
// ============================================================================

impl serde::Serialize for VaultError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("VaultError", 2)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_error_serialization() {
        let err = VaultError::WrongPassword;
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("WRONG_PASSWORD"));
        assert!(json.contains("Wrong password"));
    }

    #[test]
    fn test_store_error_converts_unchanged() {
        let err: VaultError = StoreError::NotFound("abc".into()).into();
        assert!(matches!(err, VaultError::Store(StoreError::NotFound(ref id)) if id == "abc"));
        assert_eq!(err.code(), "STORE_ERROR");
    }

    #[test]
    fn test_invalid_state_message() {
        let err = VaultError::InvalidState {
            operation: "unlock",
            state: VaultState::Unlocked,
        };
        assert_eq!(err.to_string(), "Cannot unlock while vault is Unlocked");
    }

    #[test]
    fn test_item_failure_classification() {
        assert!(VaultError::AuthenticationFailure.is_item_failure());
        assert!(VaultError::MalformedItem("bad json".into()).is_item_failure());
        assert!(!VaultError::WrongPassword.is_item_failure());
    }
}
