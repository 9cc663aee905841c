//! fvault-engine: folder encryption state transitions
//!
//! `encrypt_folder` walks a root, encrypts every regular file in place under
//! one folder key, and persists that key sealed under the passphrase in a
//! sidecar file inside the root. `decrypt_folder` reverses the operation.
//! Originals and ciphertexts are destructively overwritten before removal so
//! plaintext and ciphertext for the same file never coexist after a
//! transition completes.
//!
//! Exactly one process may operate on a given root at a time; a decrypt and
//! an encrypt racing on the same sidecar is undefined.

pub mod erase;
pub mod folder;
pub mod walk;

pub use erase::secure_erase;
pub use folder::{decrypt_folder, encrypt_folder, FolderReport, ProgressFn};
pub use walk::collect_files;
