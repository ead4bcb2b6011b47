//! JSON-file vault store for local hosts.
//!
//! The whole store is one JSON document holding the salt and the encrypted
//! items exactly as the backend would hold them. Writes go to a temp file
//! and are renamed into place.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::security::generate_salt;
use crate::vault::model::{CreatedItem, CreatedVault, EncryptedPayload, VaultItem, VaultStatusRecord};
use crate::vault::VaultStore;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VaultRecord {
    salt: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    vault: Option<VaultRecord>,
    /// Newest first
    #[serde(default)]
    items: Vec<VaultItem>,
}

pub struct FileVaultStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileVaultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> StoreResult<StoreFile> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, file: &StoreFile) -> StoreResult<()> {
        let content = serde_json::to_vec_pretty(file)?;

        // Write atomically (write to temp file, then rename)
        let temp_path = self.temp_path();
        match std::fs::remove_file(&temp_path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut temp = options.open(&temp_path)?;
        temp.write_all(&content)?;
        temp.sync_all()?;
        drop(temp);

        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl VaultStore for FileVaultStore {
    async fn vault_status(&self) -> StoreResult<VaultStatusRecord> {
        let _guard = self.lock.lock().await;
        let file = self.read()?;
        Ok(match file.vault {
            Some(vault) => VaultStatusRecord {
                exists: true,
                salt: Some(vault.salt),
                created_at: Some(vault.created_at),
            },
            None => VaultStatusRecord::default(),
        })
    }

    async fn create_vault(&self) -> StoreResult<CreatedVault> {
        let _guard = self.lock.lock().await;
        let mut file = self.read()?;
        if file.vault.is_some() {
            return Err(StoreError::AlreadyExists);
        }

        let record = VaultRecord {
            salt: generate_salt(),
            created_at: Utc::now(),
        };
        file.vault = Some(record.clone());
        self.write(&file)?;

        debug!("Created vault store at {:?}", self.path);
        Ok(CreatedVault {
            salt: record.salt,
            created_at: record.created_at,
        })
    }

    async fn list_items(&self) -> StoreResult<Vec<VaultItem>> {
        let _guard = self.lock.lock().await;
        Ok(self.read()?.items)
    }

    async fn create_item(&self, payload: &EncryptedPayload) -> StoreResult<CreatedItem> {
        let _guard = self.lock.lock().await;
        let mut file = self.read()?;
        if file.vault.is_none() {
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
        file.items.insert(0, item);
        self.write(&file)?;
        Ok(created)
    }

    async fn update_item(&self, id: &str, payload: &EncryptedPayload) -> StoreResult<String> {
        let _guard = self.lock.lock().await;
        let mut file = self.read()?;
        let item = file
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        item.encrypted_payload = payload.encrypted_payload.clone();
        item.nonce = payload.nonce.clone();
        self.write(&file)?;
        Ok(id.to_string())
    }

    async fn delete_item(&self, id: &str) -> StoreResult<()> {
        let _guard = self.lock.lock().await;
        let mut file = self.read()?;
        let before = file.items.len();
        file.items.retain(|i| i.id != id);
        if file.items.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.write(&file)
    }
}
