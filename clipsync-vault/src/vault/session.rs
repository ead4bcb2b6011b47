//! VaultSession - lifecycle of one client's Secure Vault.
//!
//! The session owns the derived key while unlocked and the decrypted item
//! cache built from it. It is the only owner of key material: `lock()`,
//! a failed unlock, and dropping the session all erase the key.
//!
//! All operations take `&mut self`, so callers are forced to run them one
//! at a time. Any store failure leaves the session exactly as it was
//! before the call.

use tracing::{debug, info};

use super::error::{VaultError, VaultResult};
use super::model::DecryptedItem;
use super::reconciler::reconcile;
use super::state::VaultState;
use super::store::VaultStore;
use super::validation::{normalize_item, validate_confirmation, validate_master_password};
use crate::security::{derive_key_blocking, encrypt_payload, VaultKey};
use crate::storage::VaultSettings;

/// Stateful orchestrator of the Secure Vault for one client.
pub struct VaultSession<S: VaultStore> {
    store: S,
    settings: VaultSettings,
    state: VaultState,
    /// Base64 salt, known once the vault exists
    salt: Option<String>,
    /// The derived key (only present when unlocked)
    key: Option<VaultKey>,
    /// Decrypted items, newest first (only populated when unlocked)
    items: Vec<DecryptedItem>,
}

/// Keeps the session in `Unlocking` for the duration of an unlock attempt.
///
/// If the attempt fails, or its future is dropped before completion, the
/// state falls back to `Locked`.
struct UnlockAttempt<'a> {
    state: &'a mut VaultState,
}

impl<'a> UnlockAttempt<'a> {
    fn begin(state: &'a mut VaultState) -> Self {
        *state = VaultState::Unlocking;
        Self { state }
    }

    fn succeed(self) {
        *self.state = VaultState::Unlocked;
    }
}

impl Drop for UnlockAttempt<'_> {
    fn drop(&mut self) {
        if *self.state == VaultState::Unlocking {
            *self.state = VaultState::Locked;
        }
    }
}

impl<S: VaultStore> VaultSession<S> {
    /// Create a session in `NoVault` without contacting the store.
    ///
    /// Call [`refresh_status`](Self::refresh_status) to pick up an existing
    /// vault, or use [`open`](Self::open).
    pub fn new(store: S, settings: VaultSettings) -> Self {
        Self {
            store,
            settings,
            state: VaultState::NoVault,
            salt: None,
            key: None,
            items: Vec::new(),
        }
    }

    /// Create a session and load the vault status from the store.
    pub async fn open(store: S, settings: VaultSettings) -> VaultResult<Self> {
        let mut session = Self::new(store, settings);
        session.refresh_status().await?;
        Ok(session)
    }

    pub fn state(&self) -> VaultState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == VaultState::Unlocked
    }

    /// The vault's base64 salt, once known.
    pub fn salt(&self) -> Option<&str> {
        self.salt.as_deref()
    }

    pub fn settings(&self) -> &VaultSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn require(&self, expected: VaultState, operation: &'static str) -> VaultResult<()> {
        if self.state != expected {
            return Err(VaultError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Ask the store whether a vault exists and move to `NoVault` or `Locked`.
    ///
    /// Not permitted while unlocked; lock first.
    pub async fn refresh_status(&mut self) -> VaultResult<VaultState> {
        if matches!(self.state, VaultState::Unlocked | VaultState::Unlocking) {
            return Err(VaultError::InvalidState {
                operation: "refresh status",
                state: self.state,
            });
        }

        let status = self.store.vault_status().await?;
        match (status.exists, status.salt) {
            (true, Some(salt)) => {
                self.salt = Some(salt);
                self.state = VaultState::Locked;
            }
            (true, None) => {
                return Err(VaultError::Decode("Vault status is missing its salt".into()));
            }
            (false, _) => {
                self.salt = None;
                self.state = VaultState::NoVault;
            }
        }

        debug!("Vault status refreshed: {}", self.state);
        Ok(self.state)
    }

    /// Create the vault and unlock it with `password`.
    ///
    /// The password is validated before the store is contacted. On success
    /// the session is `Unlocked` with no items.
    ///
    /// # Errors
    /// `Validation` for a too-short password, `Store(AlreadyExists)` if the
    /// backend already holds a vault for this account.
    pub async fn create(&mut self, password: &str) -> VaultResult<()> {
        self.require(VaultState::NoVault, "create vault")?;
        validate_master_password(password, self.settings.min_password_length)?;

        info!("Creating secure vault");
        let created = self.store.create_vault().await?;

        // The vault exists from here on, even if derivation fails below.
        self.salt = Some(created.salt.clone());
        self.state = VaultState::Locked;

        let key = derive_key_blocking(password, &created.salt).await?;

        self.key = Some(key);
        self.items.clear();
        self.state = VaultState::Unlocked;

        info!("Secure vault created");
        Ok(())
    }

    /// [`create`](Self::create) after checking the confirmation entry.
    pub async fn create_with_confirmation(
        &mut self,
        password: &str,
        confirmation: &str,
    ) -> VaultResult<()> {
        self.require(VaultState::NoVault, "create vault")?;
        validate_master_password(password, self.settings.min_password_length)?;
        validate_confirmation(password, confirmation)?;
        self.create(password).await
    }

    /// Unlock the vault: derive the key, fetch every stored item and decrypt.
    ///
    /// Items that fail to decrypt are skipped. If there were items and none
    /// decrypted, the key is discarded and `WrongPassword` is returned.
    pub async fn unlock(&mut self, password: &str) -> VaultResult<()> {
        self.require(VaultState::Locked, "unlock")?;
        if password.is_empty() {
            return Err(VaultError::Validation("Master password is required".into()));
        }
        let salt = self.salt.clone().ok_or(VaultError::NotSetup)?;

        info!("Unlocking secure vault");
        let attempt = UnlockAttempt::begin(&mut self.state);

        let key = derive_key_blocking(password, &salt).await?;
        let stored = self.store.list_items().await?;
        let items = reconcile(&key, &stored, self.settings.decrypt_yield_interval).await?;

        self.key = Some(key);
        self.items = items;
        attempt.succeed();

        info!("Secure vault unlocked with {} items", self.items.len());
        Ok(())
    }

    /// Lock the vault, erasing the key and every decrypted item.
    pub fn lock(&mut self) -> VaultResult<()> {
        self.require(VaultState::Unlocked, "lock")?;

        info!("Locking secure vault");
        // VaultKey and DecryptedItem zeroize on drop
        self.key = None;
        self.items.clear();
        self.state = VaultState::Locked;
        Ok(())
    }

    fn live_key(&self, operation: &'static str) -> VaultResult<&VaultKey> {
        self.require(VaultState::Unlocked, operation)?;
        self.key.as_ref().ok_or(VaultError::InvalidState {
            operation,
            state: self.state,
        })
    }

    /// Decrypted items, newest first.
    pub fn items(&self) -> VaultResult<&[DecryptedItem]> {
        self.require(VaultState::Unlocked, "read items")?;
        Ok(&self.items)
    }

    pub fn item(&self, id: &str) -> VaultResult<&DecryptedItem> {
        self.require(VaultState::Unlocked, "read item")?;
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| VaultError::ItemNotFound(id.to_string()))
    }

    /// Encrypt and store a new item. Returns the id assigned by the store.
    pub async fn add_item(&mut self, title: &str, content: &str) -> VaultResult<String> {
        let key = self.live_key("add item")?;
        let payload = normalize_item(title, content)?;

        let sealed = encrypt_payload(key, &payload)?;
        let created = self.store.create_item(&sealed).await?;

        debug!("Stored secure item {}", created.id);
        let id = created.id.clone();
        self.items.insert(
            0,
            DecryptedItem::from_payload(created.id, payload, created.created_at),
        );
        Ok(id)
    }

    /// Re-encrypt an existing item with new fields and a fresh nonce.
    pub async fn update_item(&mut self, id: &str, title: &str, content: &str) -> VaultResult<()> {
        let key = self.live_key("update item")?;
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| VaultError::ItemNotFound(id.to_string()))?;
        let payload = normalize_item(title, content)?;

        let sealed = encrypt_payload(key, &payload)?;
        self.store.update_item(id, &sealed).await?;

        debug!("Updated secure item {}", id);
        let created_at = self.items[index].created_at;
        self.items[index] = DecryptedItem::from_payload(id.to_string(), payload, created_at);
        Ok(())
    }

    /// Delete an item from the store and the cache.
    pub async fn delete_item(&mut self, id: &str) -> VaultResult<()> {
        self.require(VaultState::Unlocked, "delete item")?;

        self.store.delete_item(id).await?;

        debug!("Deleted secure item {}", id);
        self.items.retain(|i| i.id != id);
        Ok(())
    }
}

impl<S: VaultStore> std::fmt::Debug for VaultSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("state", &self.state)
            .field("salt", &self.salt)
            .field("key", &self.key)
            .field("items", &self.items.len())
            .finish()
    }
}
