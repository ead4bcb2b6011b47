//! The storage contract the session consumes.
//!
//! The backend only ever sees the salt and base64 ciphertext blobs. It never
//! receives the master password, the derived key, or any plaintext.

use std::sync::Arc;

use async_trait::async_trait;

use super::model::{CreatedItem, CreatedVault, EncryptedPayload, VaultItem, VaultStatusRecord};
use crate::error::StoreResult;

/// Backend persistence for one account's vault.
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Whether a vault exists, and its salt if it does.
    async fn vault_status(&self) -> StoreResult<VaultStatusRecord>;

    /// Allocate a vault with a fresh random salt.
    ///
    /// Must fail with `StoreError::AlreadyExists` if one is already present.
    async fn create_vault(&self) -> StoreResult<CreatedVault>;

    /// All stored items, newest first.
    async fn list_items(&self) -> StoreResult<Vec<VaultItem>>;

    async fn create_item(&self, payload: &EncryptedPayload) -> StoreResult<CreatedItem>;

    /// Replace an item's ciphertext and nonce. Returns the item id.
    async fn update_item(&self, id: &str, payload: &EncryptedPayload) -> StoreResult<String>;

    async fn delete_item(&self, id: &str) -> StoreResult<()>;
}

#[async_trait]
impl<T: VaultStore + ?Sized> VaultStore for Arc<T> {
    async fn vault_status(&self) -> StoreResult<VaultStatusRecord> {
        (**self).vault_status().await
    }

    async fn create_vault(&self) -> StoreResult<CreatedVault> {
        (**self).create_vault().await
    }

    async fn list_items(&self) -> StoreResult<Vec<VaultItem>> {
        (**self).list_items().await
    }

    async fn create_item(&self, payload: &EncryptedPayload) -> StoreResult<CreatedItem> {
        (**self).create_item(payload).await
    }

    async fn update_item(&self, id: &str, payload: &EncryptedPayload) -> StoreResult<String> {
        (**self).update_item(id, payload).await
    }

    async fn delete_item(&self, id: &str) -> StoreResult<()> {
        (**self).delete_item(id).await
    }
}
