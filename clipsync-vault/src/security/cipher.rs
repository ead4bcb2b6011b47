//! AES-256-GCM encryption of individual vault items.
//!
//! Wire format per item: the store keeps `ciphertext || 16-byte tag` and the
//! 12-byte nonce as two separate base64 strings. The plaintext is the UTF-8
//! JSON document `{"title":...,"content":...}` with no padding or
//! compression.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use data_encoding::BASE64;
use rand::RngCore;
use zeroize::Zeroizing;

use super::kdf::VaultKey;
use crate::vault::model::{EncryptedPayload, SecurePayload};
use crate::vault::{VaultError, VaultResult};

/// Nonce size for AES-GCM (96 bits = 12 bytes)
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size appended to every ciphertext (128 bits)
pub const TAG_SIZE: usize = 16;

/// Raw output of a single [`encrypt`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedItem {
    /// Ciphertext with the authentication tag appended
    pub ciphertext: Vec<u8>,
    /// The nonce used for this encryption, never reused
    pub nonce: [u8; NONCE_SIZE],
}

fn cipher_for(key: &VaultKey) -> VaultResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| VaultError::Encryption(format!("Invalid key: {}", e)))
}

/// Encrypt `plaintext` under `key` with a freshly generated random nonce.
pub fn encrypt(key: &VaultKey, plaintext: &[u8]) -> VaultResult<SealedItem> {
    let cipher = cipher_for(key)?;

    // Generate random nonce
    let mut nonce = [0u8; NONCE_SIZE];
    rand::rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| VaultError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(SealedItem { ciphertext, nonce })
}

/// Decrypt and authenticate `ciphertext` (tag appended) under `key`.
///
/// # Errors
/// `AuthenticationFailure` when the tag does not verify (wrong key or any
/// modification of ciphertext, tag or nonce). `MalformedItem` when the
/// inputs cannot even be an AES-GCM message.
pub fn decrypt(key: &VaultKey, ciphertext: &[u8], nonce: &[u8]) -> VaultResult<Zeroizing<Vec<u8>>> {
    if nonce.len() != NONCE_SIZE {
        return Err(VaultError::MalformedItem(format!(
            "Invalid nonce length: expected {} bytes, got {}",
            NONCE_SIZE,
            nonce.len()
        )));
    }
    if ciphertext.len() < TAG_SIZE {
        return Err(VaultError::MalformedItem(
            "Ciphertext shorter than authentication tag".into(),
        ));
    }

    let cipher = cipher_for(key)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| VaultError::AuthenticationFailure)
}

/// Serialize, encrypt and base64-encode a `{title, content}` payload.
pub fn encrypt_payload(key: &VaultKey, payload: &SecurePayload) -> VaultResult<EncryptedPayload> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(payload)
            .map_err(|e| VaultError::Encryption(format!("Failed to encode payload: {}", e)))?,
    );
    let sealed = encrypt(key, &plaintext)?;

    Ok(EncryptedPayload {
        encrypted_payload: BASE64.encode(&sealed.ciphertext),
        nonce: BASE64.encode(&sealed.nonce),
    })
}

/// Reverse of [`encrypt_payload`]: decode, decrypt and parse one item.
pub fn decrypt_payload(
    key: &VaultKey,
    encrypted_payload: &str,
    nonce: &str,
) -> VaultResult<SecurePayload> {
    let ciphertext = BASE64
        .decode(encrypted_payload.as_bytes())
        .map_err(|e| VaultError::MalformedItem(format!("Invalid payload encoding: {}", e)))?;
    let nonce = BASE64
        .decode(nonce.as_bytes())
        .map_err(|e| VaultError::MalformedItem(format!("Invalid nonce encoding: {}", e)))?;

    let plaintext = decrypt(key, &ciphertext, &nonce)?;

    serde_json::from_slice(&plaintext)
        .map_err(|e| VaultError::MalformedItem(format!("Payload is not a secure item: {}", e)))
}
