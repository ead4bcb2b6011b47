//! Master-password key derivation.
//!
//! PBKDF2-HMAC-SHA256 with a fixed 100,000 iterations and a 256-bit output.
//! Every ClipSync client derives the vault key with exactly these parameters;
//! changing any of them makes existing vaults unreadable on other devices.

use data_encoding::BASE64;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::vault::{VaultError, VaultResult};

/// PBKDF2 iteration count shared by all clients.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt size in bytes (256 bits), generated once per vault.
pub const SALT_SIZE: usize = 32;

/// Derived key size in bytes (256 bits, AES-256).
pub const KEY_SIZE: usize = 32;

/// A 256-bit vault key with automatic zeroization on drop.
///
/// Deliberately not `Clone`: the session is the only owner, and dropping
/// it (on lock, failed unlock, or teardown) erases the key material.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct VaultKey {
    key: [u8; KEY_SIZE],
}

impl VaultKey {
    /// Wrap raw key bytes, e.g. a key obtained from another client's fixture.
    pub fn from_bytes(mut bytes: [u8; KEY_SIZE]) -> Self {
        let key = Self { key: bytes };
        bytes.zeroize();
        key
    }

    /// Get the key as a byte slice for cryptographic operations.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt, base64-encoded for the store.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_SIZE];
    rand::rng().fill_bytes(&mut salt);
    BASE64.encode(&salt)
}

/// Decode a base64 salt as returned by the store.
pub fn decode_salt(salt_b64: &str) -> VaultResult<Vec<u8>> {
    let salt = BASE64
        .decode(salt_b64.as_bytes())
        .map_err(|e| VaultError::Decode(format!("Invalid salt encoding: {}", e)))?;

    if salt.is_empty() {
        return Err(VaultError::Decode("Salt is empty".into()));
    }

    Ok(salt)
}

/// Derive the vault key from the master password and the vault's salt.
///
/// Deterministic: the same password and salt always yield the same key, on
/// every client. This is CPU-bound (tens to hundreds of milliseconds); async
/// callers should use [`derive_key_blocking`].
///
/// # Errors
/// Returns `Decode` if the salt is not valid base64.
pub fn derive_key(password: &str, salt_b64: &str) -> VaultResult<VaultKey> {
    let salt = decode_salt(salt_b64)?;
    let key = derive_key_with_iterations(password.as_bytes(), &salt, PBKDF2_ITERATIONS);
    debug!("Derived {}-byte vault key", KEY_SIZE);
    Ok(key)
}

/// Run [`derive_key`] on the blocking thread pool.
///
/// The password is copied into a zeroizing buffer that moves into the
/// worker and is erased when the worker finishes.
pub async fn derive_key_blocking(password: &str, salt_b64: &str) -> VaultResult<VaultKey> {
    let password = Zeroizing::new(password.to_owned());
    let salt_b64 = salt_b64.to_owned();

    tokio::task::spawn_blocking(move || derive_key(&password, &salt_b64))
        .await
        .map_err(|e| VaultError::KeyDerivation(format!("Derivation task failed: {}", e)))?
}

fn derive_key_with_iterations(password: &[u8], salt: &[u8], iterations: u32) -> VaultKey {
    let mut key = VaultKey {
        key: [0u8; KEY_SIZE],
    };
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key.key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_salt(byte: u8) -> String {
        BASE64.encode(&[byte; SALT_SIZE])
    }

    #[test]
    fn test_derive_key_deterministic() {
        let salt = fixed_salt(1);
        let key1 = derive_key("hunter12-pw", &salt).unwrap();
        let key2 = derive_key("hunter12-pw", &salt).unwrap();

        assert_eq!(
            key1.as_bytes(),
            key2.as_bytes(),
            "Same password and salt should produce same key"
        );
        assert_eq!(key1.as_bytes().len(), KEY_SIZE, "Key should be 32 bytes");
    }

    #[test]
    fn test_derive_key_different_passwords() {
        let salt = fixed_salt(1);
        let key1 = derive_key("hunter12-pw", &salt).unwrap();
        let key2 = derive_key("hunter13-pw", &salt).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_salts() {
        let key1 = derive_key("hunter12-pw", &fixed_salt(1)).unwrap();
        let key2 = derive_key("hunter12-pw", &fixed_salt(2)).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_rejects_bad_salt() {
        assert!(matches!(
            derive_key("hunter12-pw", "not base64!"),
            Err(VaultError::Decode(_))
        ));
        assert!(matches!(
            derive_key("hunter12-pw", ""),
            Err(VaultError::Decode(_))
        ));
    }

    // RFC 7914 / widely published PBKDF2-HMAC-SHA256 vectors.
    #[test]
    fn test_pbkdf2_sha256_known_answers() {
        let one = derive_key_with_iterations(b"password", b"salt", 1);
        assert_eq!(
            hex::encode(one.as_bytes()),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );

        let many = derive_key_with_iterations(b"password", b"salt", 4096);
        assert_eq!(
            hex::encode(many.as_bytes()),
            "c5e478d59288c841aa530db6845c4c8d962893a001ce4e11a4963873aa98134a"
        );
    }

    #[test]
    fn test_generate_salt_is_random_and_sized() {
        let a = generate_salt();
        let b = generate_salt();
        assert_ne!(a, b);
        assert_eq!(decode_salt(&a).unwrap().len(), SALT_SIZE);
    }

    #[test]
    fn test_vault_key_debug_is_redacted() {
        let key = VaultKey::from_bytes([0xAB; KEY_SIZE]);
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("171"));
    }

    #[tokio::test]
    async fn test_derive_key_blocking_matches_sync() {
        let salt = fixed_salt(7);
        let sync_key = derive_key("hunter12-pw", &salt).unwrap();
        let async_key = derive_key_blocking("hunter12-pw", &salt).await.unwrap();
        assert_eq!(sync_key.as_bytes(), async_key.as_bytes());
    }
}
