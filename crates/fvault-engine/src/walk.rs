//! Recursive enumeration of regular files under a folder root.

use std::path::{Path, PathBuf};

use fvault_core::{VaultError, VaultResult};

/// Collect all regular files under `root` recursively, in deterministic
/// (sorted) order. Directories are descended into; symlinks and other
/// non-regular entries are skipped.
pub fn collect_files(root: &Path) -> VaultResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(VaultError::NotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    collect_files_inner(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files_inner(dir: &Path, out: &mut Vec<PathBuf>) -> VaultResult<()> {
    for entry in std::fs::read_dir(dir).map_err(|e| VaultError::from_io(e, dir))? {
        let entry = entry.map_err(|e| VaultError::from_io(e, dir))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| VaultError::from_io(e, &path))?;

        if meta.is_dir() {
            collect_files_inner(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_nested_files_sorted() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("b/deep")).unwrap();
        std::fs::write(tmp.path().join("z.txt"), b"z").unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"a").unwrap();
        std::fs::write(tmp.path().join("b/deep/c.txt"), b"c").unwrap();

        let files = collect_files(tmp.path()).unwrap();

        assert_eq!(
            files,
            vec![
                tmp.path().join("a.txt"),
                tmp.path().join("b/deep/c.txt"),
                tmp.path().join("z.txt"),
            ]
        );
    }

    #[test]
    fn test_collect_empty_folder() {
        let tmp = TempDir::new().unwrap();
        assert!(collect_files(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_collect_missing_root() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");

        let result = collect_files(&missing);
        assert!(matches!(result, Err(VaultError::NotFound(p)) if p == missing));
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_skips_symlinks() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("real.txt");
        std::fs::write(&target, b"real").unwrap();
        std::os::unix::fs::symlink(&target, tmp.path().join("link.txt")).unwrap();

        let files = collect_files(tmp.path()).unwrap();
        assert_eq!(files, vec![target]);
    }
}
