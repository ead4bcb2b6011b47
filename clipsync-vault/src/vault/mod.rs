//! The Secure Vault: a client-side, zero-knowledge encrypted store for
//! passwords and other secrets.
//!
//! The master password is stretched with PBKDF2 into an AES-256-GCM key that
//! only ever lives inside an unlocked [`VaultSession`]. The backend store
//! holds the salt and opaque ciphertext, nothing else.

pub mod error;
pub mod model;
pub mod reconciler;
pub mod session;
pub mod state;
pub mod store;
pub mod validation;

pub use error::{VaultError, VaultResult};
pub use model::{
    CreatedItem, CreatedVault, DecryptedItem, EncryptedPayload, SecurePayload, VaultItem,
    VaultStatusRecord,
};
pub use reconciler::{decrypt_item, reconcile, ItemOutcome, ReconcileReport};
pub use session::VaultSession;
pub use state::VaultState;
pub use store::VaultStore;
