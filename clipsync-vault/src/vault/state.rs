//! Session state for the Secure Vault.

use serde::{Deserialize, Serialize};

/// Represents the current state of a vault session.
///
/// The session transitions between these states:
/// - `NoVault` → `Unlocked` (after `create`)
/// - `Locked` → `Unlocking` → `Unlocked` (successful `unlock`)
/// - `Unlocking` → `Locked` (wrong password or store failure)
/// - `Unlocked` → `Locked` (`lock`)
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum VaultState {
    /// No vault exists for this account yet
    #[default]
    NoVault,
    /// Vault exists; no key is held
    Locked,
    /// Key derivation and batch decryption are in progress
    Unlocking,
    /// Key is held and decrypted items are available
    Unlocked,
}

impl std::fmt::Display for VaultState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoVault => write!(f, "NoVault"),
            Self::Locked => write!(f, "Locked"),
            Self::Unlocking => write!(f, "Unlocking"),
            Self::Unlocked => write!(f, "Unlocked"),
        }
    }
}
