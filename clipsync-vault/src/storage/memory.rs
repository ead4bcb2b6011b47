//! In-process vault store.
//!
//! Behaves like the backend: it allocates salts and ids, orders items newest
//! first and refuses a second vault. It can also be switched offline so every
//! call fails, which is how store-failure paths are exercised.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::security::generate_salt;
use crate::vault::model::{CreatedItem, CreatedVault, EncryptedPayload, VaultItem, VaultStatusRecord};
use crate::vault::VaultStore;

#[derive(Debug, Default)]
struct MemoryState {
    vault: Option<(String, DateTime<Utc>)>,
    /// Oldest first; listing reverses
    items: Vec<VaultItem>,
}

#[derive(Debug, Default)]
pub struct MemoryVaultStore {
    state: RwLock<MemoryState>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl MemoryVaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of store calls made so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, operation: &str) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{}: store offline", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl VaultStore for MemoryVaultStore {
    async fn vault_status(&self) -> StoreResult<VaultStatusRecord> {
        self.enter("vault status")?;
        let state = self.state.read().await;
        Ok(match &state.vault {
            Some((salt, created_at)) => VaultStatusRecord {
                exists: true,
                salt: Some(salt.clone()),
                created_at: Some(*created_at),
            },
            None => VaultStatusRecord::default(),
        })
    }

    async fn create_vault(&self) -> StoreResult<CreatedVault> {
        self.enter("create vault")?;
        let mut state = self.state.write().await;
        if state.vault.is_some() {
            return Err(StoreError::AlreadyExists);
        }

        let salt = generate_salt();
        let created_at = Utc::now();
        state.vault = Some((salt.clone(), created_at));
        debug!("Memory store: vault created");
        Ok(CreatedVault { salt, created_at })
    }

    async fn list_items(&self) -> StoreResult<Vec<VaultItem>> {
        self.enter("list items")?;
        let state = self.state.read().await;
        Ok(state.items.iter().rev().cloned().collect())
    }

    async fn create_item(&self, payload: &EncryptedPayload) -> StoreResult<CreatedItem> {
        self.enter("create item")?;
        let mut state = self.state.write().await;
        if state.vault.is_none() {
            return Err(StoreError::NotSetup);
        }

        let item = VaultItem {
            id: Uuid::new_v4().to_string(),
            encrypted_payload: payload.encrypted_payload.clone(),
            nonce: payload.nonce.clone(),
            created_at: Utc::now(),
        };
        let created = CreatedItem {
            id: item.id.clone(),
            created_at: item.created_at,
        };
        state.items.push(item);
        Ok(created)
    }

    async fn update_item(&self, id: &str, payload: &EncryptedPayload) -> StoreResult<String> {
        self.enter("update item")?;
        let mut state = self.state.write().await;
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        item.encrypted_payload = payload.encrypted_payload.clone();
        item.nonce = payload.nonce.clone();
        Ok(item.id.clone())
    }

    async fn delete_item(&self, id: &str) -> StoreResult<()> {
        self.enter("delete item")?;
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|i| i.id != id);
        if state.items.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
