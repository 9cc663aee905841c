use std::path::{Path, PathBuf};

use thiserror::Error;

pub type VaultResult<T> = Result<T, VaultError>;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("not found: {0}")]
    NotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("invalid envelope: expected {expected} bytes, got {actual}")]
    InvalidEnvelope { expected: usize, actual: usize },

    #[error("decryption failed: wrong passphrase or corrupted data")]
    DecryptionFailed,

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error(
        "folder operation incomplete: {} of {} file(s) failed",
        .failed.len(),
        .failed.len() + .processed.len()
    )]
    PartialFolderFailure {
        /// Files that were transformed before or despite the failures
        processed: Vec<PathBuf>,
        /// Failed files with the reason each one failed
        failed: Vec<(PathBuf, String)>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// Classify an I/O error against the path it occurred on.
    pub fn from_io(err: std::io::Error, path: &Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => VaultError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                VaultError::PermissionDenied(path.to_path_buf())
            }
            _ => VaultError::Io(err),
        }
    }
}
