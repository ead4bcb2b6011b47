//! Records exchanged with the vault store and held by the session.
//!
//! Store-facing records use the backend's camelCase JSON field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The plaintext document encrypted into every vault item.
///
/// Field order matters: serde emits `title` then `content`, which matches
/// the other clients' `JSON.stringify({ title, content })` byte for byte.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecurePayload {
    pub title: String,
    pub content: String,
}

impl SecurePayload {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

impl std::fmt::Debug for SecurePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurePayload")
            .field("title", &self.title)
            .field("content", &"[REDACTED]")
            .finish()
    }
}

/// Base64 ciphertext and nonce as sent to the store on create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedPayload {
    /// Base64 of `ciphertext || tag`
    pub encrypted_payload: String,
    /// Base64 of the 12-byte nonce
    pub nonce: String,
}

/// A vault item as persisted by the store. Opaque to everyone but the key holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultItem {
    pub id: String,
    pub encrypted_payload: String,
    pub nonce: String,
    pub created_at: DateTime<Utc>,
}

/// A decrypted vault item, only ever held by an unlocked session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct DecryptedItem {
    pub id: String,
    pub title: String,
    pub content: String,
    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,
}

impl DecryptedItem {
    /// Build an item from a decrypted payload, taking ownership of its strings.
    pub fn from_payload(id: String, mut payload: SecurePayload, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: std::mem::take(&mut payload.title),
            content: std::mem::take(&mut payload.content),
            created_at,
        }
    }
}

impl std::fmt::Debug for DecryptedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedItem")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("content", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Response of the store's vault-status call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultStatusRecord {
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Response of the store's create-vault call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedVault {
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

/// Response of the store's create-item call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedItem {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_item_uses_backend_field_names() {
        let json = r#"{
            "id": "6f1c",
            "encryptedPayload": "AAAA",
            "nonce": "BBBB",
            "createdAt": "2024-05-01T12:00:00Z"
        }"#;
        let item: VaultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "6f1c");
        assert_eq!(item.encrypted_payload, "AAAA");

        let back = serde_json::to_string(&item).unwrap();
        assert!(back.contains("\"encryptedPayload\""));
        assert!(back.contains("\"createdAt\""));
    }

    #[test]
    fn test_status_without_vault() {
        let status: VaultStatusRecord = serde_json::from_str(r#"{"exists":false}"#).unwrap();
        assert!(!status.exists);
        assert!(status.salt.is_none());
        assert_eq!(serde_json::to_string(&status).unwrap(), r#"{"exists":false}"#);
    }

    #[test]
    fn test_secret_fields_are_redacted_in_debug() {
        let item = DecryptedItem::from_payload(
            "1".into(),
            SecurePayload::new("Gmail", "p@ss"),
            Utc::now(),
        );
        let rendered = format!("{:?}", item);
        assert!(rendered.contains("Gmail"));
        assert!(!rendered.contains("p@ss"));

        let payload = format!("{:?}", SecurePayload::new("Bank", "0000"));
        assert!(!payload.contains("0000"));
    }
}
