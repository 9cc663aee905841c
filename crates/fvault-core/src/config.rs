use serde::{Deserialize, Serialize};

/// Top-level configuration (loaded from fvault.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FvaultConfig {
    pub crypto: CryptoConfig,
    pub folder: FolderConfig,
}

/// Key derivation knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// PBKDF2-HMAC-SHA256 iteration count (default: 100000)
    pub kdf_iterations: u32,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: 100_000,
        }
    }
}

/// On-disk layout of an encrypted folder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Sidecar file holding the sealed folder key (default: folder.key)
    pub sidecar_name: String,
    /// Suffix appended to encrypted files (default: .enc)
    pub ciphertext_suffix: String,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            sidecar_name: "folder.key".into(),
            ciphertext_suffix: ".enc".into(),
        }
    }
}
