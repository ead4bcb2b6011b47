mod cipher;
mod kdf;

pub use cipher::{decrypt, decrypt_payload, encrypt, encrypt_payload, SealedItem, NONCE_SIZE, TAG_SIZE};
pub use kdf::{
    decode_salt, derive_key, derive_key_blocking, generate_salt, VaultKey, KEY_SIZE,
    PBKDF2_ITERATIONS, SALT_SIZE,
};
