mod config;
mod file;
mod memory;

pub use config::{load_settings, save_settings, VaultSettings};
pub use file::FileVaultStore;
pub use memory::MemoryVaultStore;
