use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::StoreResult;

/// Tunables for a vault session.
///
/// Cryptographic parameters are deliberately absent: they are fixed by the
/// cross-client format and live as constants in [`crate::security`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultSettings {
    /// Minimum master password length accepted on vault creation
    pub min_password_length: usize,
    /// Items decrypted between cooperative yields during unlock (0 = never yield)
    pub decrypt_yield_interval: usize,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            decrypt_yield_interval: 1,
        }
    }
}

/// Load settings from `path`, falling back to defaults if the file is missing.
pub fn load_settings(path: &Path) -> StoreResult<VaultSettings> {
    if !path.exists() {
        return Ok(VaultSettings::default());
    }

    let content = std::fs::read_to_string(path)?;
    let settings: VaultSettings = serde_json::from_str(&content)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &VaultSettings) -> StoreResult<()> {
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)?;
    Ok(())
}
