use thiserror::Error;

/// Failures reported by a [`VaultStore`](crate::vault::VaultStore) backend.
///
/// The session never interprets these beyond wrapping them; callers see
/// exactly what the backend reported.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Vault already exists")]
    AlreadyExists,

    #[error("Vault not set up")]
    NotSetup,

    #[error("Secure item not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
