//! fvault-crypto: passphrase-derived envelope encryption for FolderVault
//!
//! Key hierarchy:
//! ```text
//! Derived Key (256-bit, PBKDF2-HMAC-SHA256 from passphrase + per-seal salt)
//!   └── Folder Key (256-bit random, one per encrypted folder, sealed under the derived key)
//!         └── File AEAD: XChaCha20-Poly1305 (key=folder_key, nonce=random_192bit per file)
//! ```
//!
//! Sealed envelope layout (binary, 88 bytes):
//! ```text
//! [24 bytes: nonce][16 bytes: KDF salt][48 bytes: folder key ciphertext + tag]
//! ```

pub mod envelope;
pub mod fek;
pub mod file;
pub mod kdf;

pub use envelope::{open_folder_key, seal_folder_key, ENVELOPE_LEN};
pub use fek::{generate_folder_key, FolderKey};
pub use file::{decrypt_file_data, encrypt_file_data};
pub use kdf::{derive_key, DerivedKey, KdfParams};

/// Size of a derived or folder key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of a KDF salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of an XChaCha20-Poly1305 nonce (192-bit)
pub const NONCE_SIZE: usize = 24;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;
