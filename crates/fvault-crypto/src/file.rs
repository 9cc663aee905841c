//! Per-file XChaCha20-Poly1305 encryption/decryption
//!
//! Encrypted file format (binary):
//! ```text
//! [24 bytes: random nonce][N bytes: ciphertext][16 bytes: Poly1305 tag]
//! ```
//!
//! Every call draws a fresh nonce, so encrypting the same plaintext twice
//! under the same folder key never produces the same bytes. Nonce reuse under
//! one key would leak plaintext relationships; the 192-bit random nonce makes
//! collisions negligible at any realistic file count.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;

use fvault_core::{VaultError, VaultResult};

use crate::fek::FolderKey;
use crate::{NONCE_SIZE, TAG_SIZE};

/// Encrypt file contents under a folder key.
///
/// Returns: `[24-byte nonce][ciphertext][16-byte tag]`
pub fn encrypt_file_data(key: &FolderKey, plaintext: &[u8]) -> VaultResult<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| VaultError::Encryption(format!("file encryption failed: {e}")))?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt file contents produced by [`encrypt_file_data`].
///
/// Fails with `DecryptionFailed` on a wrong key, a truncated input, or any
/// tampering with nonce or ciphertext.
pub fn decrypt_file_data(key: &FolderKey, encrypted: &[u8]) -> VaultResult<Vec<u8>> {
    if encrypted.len() < NONCE_SIZE + TAG_SIZE {
        return Err(VaultError::DecryptionFailed);
    }

    let (nonce_bytes, ciphertext) = encrypted.split_at(NONCE_SIZE);
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(XNonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| VaultError::DecryptionFailed)
}
