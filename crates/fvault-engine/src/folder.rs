//! Folder encryption state transitions.
//!
//! One random folder key encrypts every file under the root; the key lives
//! only in memory except sealed inside the sidecar envelope. Neither
//! transition is atomic across the folder: a failed run leaves a mixed state,
//! reported per file, that a retry with the same passphrase resolves.
//!
//! The sidecar is written durably before any plaintext is erased, so a crash
//! mid-walk never strands encrypted files without their key. For the same
//! reason a partial decrypt retains the sidecar: the remaining ciphertext
//! files still need it.

use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tracing::{debug, info, warn};

use fvault_core::config::FvaultConfig;
use fvault_core::{VaultError, VaultResult};
use fvault_crypto::{
    decrypt_file_data, encrypt_file_data, generate_folder_key, open_folder_key, seal_folder_key,
    FolderKey, KdfParams,
};

use crate::erase::secure_erase;
use crate::walk::collect_files;

/// Progress callback type (files_done, files_total, current path)
pub type ProgressFn = Box<dyn Fn(u64, u64, &str) + Send + Sync>;

/// Outcome of a folder transition: which files changed state and which were
/// left alone.
#[derive(Debug, Default)]
pub struct FolderReport {
    /// Files transformed (encrypted or decrypted) by this run
    pub processed: Vec<PathBuf>,
    /// Files left untouched (already in the target state, or not ciphertext)
    pub skipped: Vec<PathBuf>,
}

/// Encrypt every regular file under `root` in place.
///
/// Each file is rewritten as `<name><suffix>` with a fresh nonce, and the
/// original is securely erased once its ciphertext is durably on disk. Files
/// already carrying the ciphertext suffix are skipped, so re-running on a
/// half-encrypted folder is safe. On a re-run the existing sidecar's folder
/// key is reused for newly added files; overwriting it with a fresh key would
/// orphan the ciphertext written earlier.
///
/// Per-file failures do not stop the walk; if any occurred the operation
/// returns [`VaultError::PartialFolderFailure`] naming both the transformed
/// and the failed files.
pub fn encrypt_folder(
    root: &Path,
    passphrase: &SecretString,
    config: &FvaultConfig,
    progress: Option<&ProgressFn>,
) -> VaultResult<FolderReport> {
    let sidecar = root.join(&config.folder.sidecar_name);
    let kdf = KdfParams {
        iterations: config.crypto.kdf_iterations,
    };

    let files = collect_files(root)?;

    let fek = if sidecar.exists() {
        debug!(sidecar = %sidecar.display(), "sidecar present, reusing folder key");
        let envelope = std::fs::read(&sidecar).map_err(|e| VaultError::from_io(e, &sidecar))?;
        open_folder_key(&envelope, passphrase, &kdf)?
    } else {
        let fek = generate_folder_key();
        let envelope = seal_folder_key(&fek, passphrase, &kdf)?;
        write_durably(&sidecar, &envelope)?;
        debug!(sidecar = %sidecar.display(), "sealed folder key written");
        fek
    };

    let mut report = FolderReport::default();
    let mut failed: Vec<(PathBuf, String)> = Vec::new();
    let total = files.len() as u64;

    for (i, path) in files.iter().enumerate() {
        if let Some(cb) = progress {
            cb(i as u64, total, &path.display().to_string());
        }

        if *path == sidecar {
            continue;
        }
        if has_suffix(path, &config.folder.ciphertext_suffix) {
            report.skipped.push(path.clone());
            continue;
        }

        match encrypt_one(path, &fek, &config.folder.ciphertext_suffix) {
            Ok(()) => {
                debug!(path = %path.display(), "encrypted");
                report.processed.push(path.clone());
            }
            Err(e) => {
                warn!(path = %path.display(), "encrypt failed: {e}");
                failed.push((path.clone(), e.to_string()));
            }
        }
    }

    if let Some(cb) = progress {
        cb(total, total, "done");
    }

    if !failed.is_empty() {
        return Err(VaultError::PartialFolderFailure {
            processed: report.processed,
            failed,
        });
    }

    info!(
        root = %root.display(),
        files = report.processed.len(),
        skipped = report.skipped.len(),
        "folder encrypted"
    );
    Ok(report)
}

/// Decrypt every ciphertext file under `root`, restoring the original names.
///
/// The sidecar is read and opened first; a wrong passphrase fails here with
/// [`VaultError::DecryptionFailed`] before any file is touched. Files without
/// the ciphertext suffix are skipped untouched. Once every ciphertext file
/// has been restored, the sidecar itself is securely erased.
pub fn decrypt_folder(
    root: &Path,
    passphrase: &SecretString,
    config: &FvaultConfig,
    progress: Option<&ProgressFn>,
) -> VaultResult<FolderReport> {
    let sidecar = root.join(&config.folder.sidecar_name);
    let kdf = KdfParams {
        iterations: config.crypto.kdf_iterations,
    };

    let envelope = std::fs::read(&sidecar).map_err(|e| VaultError::from_io(e, &sidecar))?;
    let fek = open_folder_key(&envelope, passphrase, &kdf)?;

    let files = collect_files(root)?;
    let mut report = FolderReport::default();
    let mut failed: Vec<(PathBuf, String)> = Vec::new();
    let total = files.len() as u64;

    for (i, path) in files.iter().enumerate() {
        if let Some(cb) = progress {
            cb(i as u64, total, &path.display().to_string());
        }

        if *path == sidecar {
            continue;
        }
        if !has_suffix(path, &config.folder.ciphertext_suffix) {
            report.skipped.push(path.clone());
            continue;
        }

        match decrypt_one(path, &fek, &config.folder.ciphertext_suffix) {
            Ok(()) => {
                debug!(path = %path.display(), "decrypted");
                report.processed.push(path.clone());
            }
            Err(e) => {
                warn!(path = %path.display(), "decrypt failed: {e}");
                failed.push((path.clone(), e.to_string()));
            }
        }
    }

    if let Some(cb) = progress {
        cb(total, total, "done");
    }

    if !failed.is_empty() {
        warn!(
            root = %root.display(),
            failed = failed.len(),
            "partial decrypt, sidecar retained"
        );
        return Err(VaultError::PartialFolderFailure {
            processed: report.processed,
            failed,
        });
    }

    secure_erase(&sidecar)?;

    info!(
        root = %root.display(),
        files = report.processed.len(),
        skipped = report.skipped.len(),
        "folder decrypted"
    );
    Ok(report)
}

fn encrypt_one(path: &Path, fek: &FolderKey, suffix: &str) -> VaultResult<()> {
    let plaintext = std::fs::read(path).map_err(|e| VaultError::from_io(e, path))?;
    let encrypted = encrypt_file_data(fek, &plaintext)?;
    write_durably(&ciphertext_path(path, suffix), &encrypted)?;
    secure_erase(path)
}

fn decrypt_one(path: &Path, fek: &FolderKey, suffix: &str) -> VaultResult<()> {
    let encrypted = std::fs::read(path).map_err(|e| VaultError::from_io(e, path))?;
    let plaintext = decrypt_file_data(fek, &encrypted)?;
    write_durably(&plaintext_path(path, suffix), &plaintext)?;
    secure_erase(path)
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(suffix))
}

fn ciphertext_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn plaintext_path(path: &Path, suffix: &str) -> PathBuf {
    // caller guarantees the suffix is present
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    path.with_file_name(name.strip_suffix(suffix).unwrap_or(name))
}

/// Write via a temp file + rename so a crash never leaves a partial file
/// under the final name.
fn write_durably(path: &Path, data: &[u8]) -> VaultResult<()> {
    let tmp = path.with_extension("fvault_tmp");
    {
        let mut file = std::fs::File::create(&tmp).map_err(|e| VaultError::from_io(e, &tmp))?;
        file.write_all(data).map_err(|e| VaultError::from_io(e, &tmp))?;
        file.sync_all().map_err(|e| VaultError::from_io(e, &tmp))?;
    }
    std::fs::rename(&tmp, path).map_err(|e| VaultError::from_io(e, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ciphertext_path_appends_suffix() {
        assert_eq!(
            ciphertext_path(Path::new("/v/a.txt"), ".enc"),
            PathBuf::from("/v/a.txt.enc")
        );
    }

    #[test]
    fn test_plaintext_path_strips_one_suffix() {
        assert_eq!(
            plaintext_path(Path::new("/v/a.txt.enc"), ".enc"),
            PathBuf::from("/v/a.txt")
        );
        // Only the outermost suffix comes off
        assert_eq!(
            plaintext_path(Path::new("/v/a.enc.enc"), ".enc"),
            PathBuf::from("/v/a.enc")
        );
    }

    #[test]
    fn test_has_suffix() {
        assert!(has_suffix(Path::new("/v/a.txt.enc"), ".enc"));
        assert!(!has_suffix(Path::new("/v/a.txt"), ".enc"));
        assert!(!has_suffix(Path::new("/v/folder.key"), ".enc"));
    }
}
