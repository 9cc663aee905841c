//! Folder key generation
//!
//! One random 256-bit key encrypts every file in a folder; the key itself is
//! only ever persisted sealed inside an envelope (see [`crate::envelope`]).

use rand::RngCore;
use zeroize::Zeroize;

use crate::KEY_SIZE;

/// A per-folder 256-bit file encryption key. Zeroized on drop.
#[derive(Clone)]
pub struct FolderKey {
    bytes: [u8; KEY_SIZE],
}

impl FolderKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for FolderKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for FolderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Generate a random 256-bit folder key.
pub fn generate_folder_key() -> FolderKey {
    let mut bytes = [0u8; KEY_SIZE];
    rand::thread_rng().fill_bytes(&mut bytes);
    FolderKey::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_key_generation() {
        let k1 = generate_folder_key();
        let k2 = generate_folder_key();
        assert_ne!(k1.as_bytes(), k2.as_bytes(), "random keys must differ");
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let key = generate_folder_key();
        assert!(format!("{key:?}").contains("REDACTED"));
    }
}
