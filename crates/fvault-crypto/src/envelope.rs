//! Folder key sealing: envelope format and seal/open operations
//!
//! Envelope layout (binary, 88 bytes):
//! ```text
//! [24 bytes: random nonce][16 bytes: KDF salt][48 bytes: folder key ciphertext + tag]
//! ```
//!
//! The salt is embedded so the passphrase is the only input needed to open
//! the envelope later. Both nonce and salt are drawn fresh from the CSPRNG on
//! every seal; reuse across seals would let an attacker correlate envelopes.
//! Poly1305 authentication makes a wrong passphrase or a tampered envelope
//! fail deterministically instead of yielding a garbage key.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use rand::RngCore;
use secrecy::SecretString;
use zeroize::Zeroize;

use fvault_core::{VaultError, VaultResult};

use crate::fek::FolderKey;
use crate::kdf::{derive_key, KdfParams};
use crate::{KEY_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// Total size of a sealed envelope in bytes
pub const ENVELOPE_LEN: usize = NONCE_SIZE + SALT_SIZE + KEY_SIZE + TAG_SIZE;

/// Seal a folder key under a passphrase.
///
/// Generates a fresh salt, derives the sealing key, and encrypts the folder
/// key with XChaCha20-Poly1305 under a fresh nonce.
///
/// Returns the `ENVELOPE_LEN`-byte envelope: `[nonce][salt][ciphertext + tag]`
pub fn seal_folder_key(
    fek: &FolderKey,
    passphrase: &SecretString,
    params: &KdfParams,
) -> VaultResult<Vec<u8>> {
    let mut salt = [0u8; SALT_SIZE];
    rand::thread_rng().fill_bytes(&mut salt);

    let derived = derive_key(passphrase, &salt, params)?;
    let cipher = XChaCha20Poly1305::new(derived.as_bytes().into());

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let sealed = cipher
        .encrypt(nonce, fek.as_bytes().as_ref())
        .map_err(|e| VaultError::Encryption(format!("folder key sealing failed: {e}")))?;

    let mut envelope = Vec::with_capacity(ENVELOPE_LEN);
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&salt);
    envelope.extend_from_slice(&sealed);
    Ok(envelope)
}

/// Open a sealed envelope, recovering the folder key.
///
/// Fails with `InvalidEnvelope` if the byte length is wrong, and with
/// `DecryptionFailed` if the passphrase is wrong or the envelope was
/// tampered with.
pub fn open_folder_key(
    envelope: &[u8],
    passphrase: &SecretString,
    params: &KdfParams,
) -> VaultResult<FolderKey> {
    if envelope.len() != ENVELOPE_LEN {
        return Err(VaultError::InvalidEnvelope {
            expected: ENVELOPE_LEN,
            actual: envelope.len(),
        });
    }

    let (nonce_bytes, rest) = envelope.split_at(NONCE_SIZE);
    let (salt_bytes, sealed) = rest.split_at(SALT_SIZE);

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(salt_bytes);

    let derived = derive_key(passphrase, &salt, params)?;
    let cipher = XChaCha20Poly1305::new(derived.as_bytes().into());

    let mut plaintext = cipher
        .decrypt(XNonce::from_slice(nonce_bytes), sealed)
        .map_err(|_| VaultError::DecryptionFailed)?;

    if plaintext.len() != KEY_SIZE {
        plaintext.zeroize();
        return Err(VaultError::DecryptionFailed);
    }

    let mut key_bytes = [0u8; KEY_SIZE];
    key_bytes.copy_from_slice(&plaintext);
    plaintext.zeroize();

    Ok(FolderKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fek::generate_folder_key;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn fast_params() -> KdfParams {
        KdfParams { iterations: 16 }
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let fek = generate_folder_key();
        let passphrase = SecretString::from("correct horse battery staple");

        let envelope = seal_folder_key(&fek, &passphrase, &fast_params()).unwrap();
        assert_eq!(envelope.len(), ENVELOPE_LEN);

        let opened = open_folder_key(&envelope, &passphrase, &fast_params()).unwrap();
        assert_eq!(opened.as_bytes(), fek.as_bytes());
    }

    #[test]
    fn test_open_wrong_passphrase() {
        let fek = generate_folder_key();
        let envelope =
            seal_folder_key(&fek, &SecretString::from("right"), &fast_params()).unwrap();

        let result = open_folder_key(&envelope, &SecretString::from("wrong"), &fast_params());
        assert!(matches!(result, Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn test_open_truncated_envelope() {
        let fek = generate_folder_key();
        let passphrase = SecretString::from("pw");
        let envelope = seal_folder_key(&fek, &passphrase, &fast_params()).unwrap();

        let result = open_folder_key(&envelope[..ENVELOPE_LEN - 1], &passphrase, &fast_params());
        assert!(matches!(
            result,
            Err(VaultError::InvalidEnvelope {
                expected: ENVELOPE_LEN,
                actual,
            }) if actual == ENVELOPE_LEN - 1
        ));
    }

    #[test]
    fn test_open_tampered_envelope() {
        let fek = generate_folder_key();
        let passphrase = SecretString::from("pw");
        let mut envelope = seal_folder_key(&fek, &passphrase, &fast_params()).unwrap();

        // Flip a byte in the sealed key (after nonce and salt)
        envelope[NONCE_SIZE + SALT_SIZE] ^= 0xFF;

        let result = open_folder_key(&envelope, &passphrase, &fast_params());
        assert!(matches!(result, Err(VaultError::DecryptionFailed)));
    }

    #[test]
    fn test_seal_fresh_nonce_and_salt_every_call() {
        let fek = generate_folder_key();
        let passphrase = SecretString::from("pw");

        let mut nonces = HashSet::new();
        let mut salts = HashSet::new();
        for _ in 0..32 {
            let envelope = seal_folder_key(&fek, &passphrase, &fast_params()).unwrap();
            nonces.insert(envelope[..NONCE_SIZE].to_vec());
            salts.insert(envelope[NONCE_SIZE..NONCE_SIZE + SALT_SIZE].to_vec());
        }

        assert_eq!(nonces.len(), 32, "nonces must never repeat");
        assert_eq!(salts.len(), 32, "salts must never repeat");
    }

    proptest! {
        #[test]
        fn prop_seal_open_roundtrip(pass in ".{0,64}") {
            let fek = generate_folder_key();
            let passphrase = SecretString::from(pass);
            let params = KdfParams { iterations: 4 };

            let envelope = seal_folder_key(&fek, &passphrase, &params).unwrap();
            let opened = open_folder_key(&envelope, &passphrase, &params).unwrap();

            prop_assert_eq!(opened.as_bytes(), fek.as_bytes());
        }
    }
}
