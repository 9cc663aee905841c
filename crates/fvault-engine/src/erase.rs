//! Best-effort destructive file removal.
//!
//! Overwrites the full file length with fresh random bytes, syncs, then
//! removes the file. This reduces what a later reader of the raw device can
//! recover, but it cannot defeat filesystem journaling, copy-on-write
//! snapshots, SSD wear-leveling, or OS-level caches. Treat it as hygiene,
//! not a guarantee.

use std::io::Write;
use std::path::Path;

use rand::RngCore;
use tracing::debug;

use fvault_core::{VaultError, VaultResult};

/// Overwrite `path` with random bytes, then remove it.
///
/// A missing path is a silent no-op, so retrying after a crash is safe.
pub fn secure_erase(path: &Path) -> VaultResult<()> {
    let mut file = match std::fs::OpenOptions::new().write(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(VaultError::from_io(e, path)),
    };

    let len = file
        .metadata()
        .map_err(|e| VaultError::from_io(e, path))?
        .len() as usize;

    let mut noise = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut noise);

    file.write_all(&noise)
        .map_err(|e| VaultError::from_io(e, path))?;
    file.sync_all().map_err(|e| VaultError::from_io(e, path))?;
    drop(file);

    std::fs::remove_file(path).map_err(|e| VaultError::from_io(e, path))?;

    debug!(path = %path.display(), bytes = len, "securely erased");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_erase_removes_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("doomed.txt");
        std::fs::write(&path, b"sensitive contents").unwrap();

        secure_erase(&path).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_erase_missing_path_is_noop() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("never-existed.txt");

        secure_erase(&path).unwrap();
        // Idempotent under retry
        secure_erase(&path).unwrap();
    }

    #[test]
    fn test_erase_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty");
        std::fs::write(&path, b"").unwrap();

        secure_erase(&path).unwrap();
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_erase_overwrites_before_unlink() {
        use std::io::{Read, Seek, SeekFrom};

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("secret.bin");
        let original = vec![0x42u8; 1024];
        std::fs::write(&path, &original).unwrap();

        // A handle opened before erasure keeps the inode alive after unlink
        let mut handle = std::fs::File::open(&path).unwrap();

        secure_erase(&path).unwrap();

        let mut leaked = Vec::new();
        handle.seek(SeekFrom::Start(0)).unwrap();
        handle.read_to_end(&mut leaked).unwrap();

        assert_eq!(leaked.len(), original.len());
        assert_ne!(leaked, original, "old content must not survive erasure");
    }
}
