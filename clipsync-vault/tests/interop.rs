//! Cross-client conformance.
//!
//! The fixtures below were produced outside this crate:
//! - `DESKTOP_*` by the desktop client's WebCrypto code path
//!   (`PBKDF2`/SHA-256/100000 → `AES-GCM`, 128-bit tag, payload from
//!   `JSON.stringify({ title, content })`);
//! - `MOBILE_*` by an independent PBKDF2 + AES-GCM implementation, as used by
//!   the mobile client.
//!
//! If any of these fail, vaults written by the other clients are unreadable.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use clipsync_vault::security::{
    decrypt, decrypt_payload, derive_key, encrypt_payload, VaultKey, KEY_SIZE,
};
use clipsync_vault::vault::{
    CreatedItem, CreatedVault, EncryptedPayload, SecurePayload, VaultStatusRecord,
};
use clipsync_vault::{
    StoreError, StoreResult, VaultError, VaultItem, VaultSession, VaultSettings, VaultState,
    VaultStore,
};
use data_encoding::BASE64;

const PASSWORD: &str = "hunter12-pw";
/// Bytes 0x00..=0x1f
const SALT: &str = "AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8=";
const DERIVED_KEY_HEX: &str = "bed91888bf9a01c6076b9578663fa8f885d9956882d742c2d9b4839e2fc5aa30";

const DESKTOP_GMAIL: (&str, &str) = (
    "8I0iemd2Bi1qgs46tQx8RvxYargxmegPK5+LvFqm5YQtrcXbgGqorYr4RjQSF59/Czw=",
    "cPwjYEe1qqZ5Bfum",
);
const DESKTOP_UNICODE: (&str, &str) = (
    "jz1vxRyc1Mol2WgYeFr6iO74Cyl17ngTH5wGrmCRSFQgC7byB2uySmlthOMEM6bCSH/l4I4LTTXrhc4xYHara4DawFjN54jp5ejsQH1/Wtg=",
    "uYDBilY4rGhOw441",
);
const UNICODE_TITLE: &str = "Wi-Fi été 🔑";
const UNICODE_CONTENT: &str = "line1\nline2 \"quoted\"";

const MOBILE_BANK: (&str, &str) = (
    "L+YlLLp2pxa4iZZfyrnVpAuDN8ZrjQQTY0EWtY0A0Cn6f1Kxafu9Ds9viQ2OsVaT6p5ZTdk=",
    "JT7MDQ0O8Aacscid",
);

fn fixture_key() -> VaultKey {
    let bytes: [u8; KEY_SIZE] = hex::decode(DERIVED_KEY_HEX)
        .unwrap()
        .try_into()
        .unwrap();
    VaultKey::from_bytes(bytes)
}

#[test]
fn test_derived_key_matches_other_clients() {
    let key = derive_key(PASSWORD, SALT).unwrap();
    assert_eq!(hex::encode(key.as_bytes()), DERIVED_KEY_HEX);
}

#[test]
fn test_desktop_items_decrypt() {
    let key = derive_key(PASSWORD, SALT).unwrap();

    let gmail = decrypt_payload(&key, DESKTOP_GMAIL.0, DESKTOP_GMAIL.1).unwrap();
    assert_eq!(gmail.title, "Gmail");
    assert_eq!(gmail.content, "p@ss");

    let unicode = decrypt_payload(&key, DESKTOP_UNICODE.0, DESKTOP_UNICODE.1).unwrap();
    assert_eq!(unicode.title, UNICODE_TITLE);
    assert_eq!(unicode.content, UNICODE_CONTENT);
}

#[test]
fn test_mobile_item_decrypts() {
    let bank = decrypt_payload(&fixture_key(), MOBILE_BANK.0, MOBILE_BANK.1).unwrap();
    assert_eq!(bank.title, "Bank PIN");
    assert_eq!(bank.content, "0000");
}

#[test]
fn test_payload_encoding_matches_desktop_bytes() {
    let key = fixture_key();
    let ciphertext = BASE64.decode(DESKTOP_UNICODE.0.as_bytes()).unwrap();
    let nonce = BASE64.decode(DESKTOP_UNICODE.1.as_bytes()).unwrap();
    let desktop_plaintext = decrypt(&key, &ciphertext, &nonce).unwrap();

    let ours = serde_json::to_vec(&SecurePayload::new(UNICODE_TITLE, UNICODE_CONTENT)).unwrap();
    assert_eq!(ours.as_slice(), desktop_plaintext.as_slice());
}

#[test]
fn test_our_items_decrypt_under_independently_held_key() {
    let ours = derive_key(PASSWORD, SALT).unwrap();
    let sealed = encrypt_payload(&ours, &SecurePayload::new("Gmail", "p@ss")).unwrap();

    assert_eq!(BASE64.decode(sealed.nonce.as_bytes()).unwrap().len(), 12);
    let theirs = fixture_key();
    let payload = decrypt_payload(&theirs, &sealed.encrypted_payload, &sealed.nonce).unwrap();
    assert_eq!(payload.content, "p@ss");
}

#[test]
fn test_wrong_password_rejects_fixture() {
    let key = derive_key("wrong-password", SALT).unwrap();
    assert!(matches!(
        decrypt_payload(&key, DESKTOP_GMAIL.0, DESKTOP_GMAIL.1),
        Err(VaultError::AuthenticationFailure)
    ));
}

/// A read-only backend snapshot holding items written by other clients.
struct FixtureStore {
    items: Vec<VaultItem>,
}

impl FixtureStore {
    fn new() -> Self {
        let at = |minute| Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap();
        let item = |id: &str, (payload, nonce): (&str, &str), minute| VaultItem {
            id: id.into(),
            encrypted_payload: payload.into(),
            nonce: nonce.into(),
            created_at: at(minute),
        };
        Self {
            items: vec![
                item("mobile-bank", MOBILE_BANK, 3),
                item("desktop-unicode", DESKTOP_UNICODE, 2),
                item("desktop-gmail", DESKTOP_GMAIL, 1),
            ],
        }
    }
}

#[async_trait]
impl VaultStore for FixtureStore {
    async fn vault_status(&self) -> StoreResult<VaultStatusRecord> {
        Ok(VaultStatusRecord {
            exists: true,
            salt: Some(SALT.into()),
            created_at: None,
        })
    }

    async fn create_vault(&self) -> StoreResult<CreatedVault> {
        Err(StoreError::AlreadyExists)
    }

    async fn list_items(&self) -> StoreResult<Vec<VaultItem>> {
        Ok(self.items.clone())
    }

    async fn create_item(&self, _payload: &EncryptedPayload) -> StoreResult<CreatedItem> {
        Err(StoreError::Unavailable("read-only fixture".into()))
    }

    async fn update_item(&self, _id: &str, _payload: &EncryptedPayload) -> StoreResult<String> {
        Err(StoreError::Unavailable("read-only fixture".into()))
    }

    async fn delete_item(&self, _id: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("read-only fixture".into()))
    }
}

#[tokio::test]
async fn test_session_unlocks_vault_written_by_other_clients() {
    let mut session = VaultSession::open(Arc::new(FixtureStore::new()), VaultSettings::default())
        .await
        .unwrap();
    assert_eq!(session.state(), VaultState::Locked);

    session.unlock(PASSWORD).await.unwrap();
    let titles: Vec<_> = session
        .items()
        .unwrap()
        .iter()
        .map(|i| i.title.clone())
        .collect();
    assert_eq!(titles, vec!["Bank PIN", UNICODE_TITLE, "Gmail"]);
}

#[tokio::test]
async fn test_session_rejects_wrong_password_on_foreign_vault() {
    let mut session = VaultSession::open(FixtureStore::new(), VaultSettings::default())
        .await
        .unwrap();

    let result = session.unlock("wrong-password").await;
    assert!(matches!(result, Err(VaultError::WrongPassword)));
    assert_eq!(session.state(), VaultState::Locked);
}
