//! ClipSync Secure Vault core.
//!
//! Master-password key derivation, per-item authenticated encryption and the
//! lock/unlock session that ties them to a ciphertext-only backend. Every
//! ClipSync client uses the same parameters, so an item written by one
//! client can be read by any other.

mod error;
pub mod security;
pub mod storage;
pub mod vault;

pub use error::{StoreError, StoreResult};
pub use storage::{FileVaultStore, MemoryVaultStore, VaultSettings};
pub use vault::{
    DecryptedItem, VaultError, VaultItem, VaultResult, VaultSession, VaultState, VaultStore,
};
