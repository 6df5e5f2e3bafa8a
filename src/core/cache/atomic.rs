//! Temp-then-rename writes
//!
//! A file at a deterministic artifact path is a cache hit, so nothing may
//! ever appear there half-written.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Sibling temp path `<target>.<uuid>.tmp`
pub fn temp_path_for(target: &Path) -> PathBuf {
    let mut name: OsString = target.as_os_str().to_owned();
    name.push(format!(".{}.tmp", Uuid::new_v4()));
    PathBuf::from(name)
}

/// Whether `path` looks like a temp file produced by [`temp_path_for`]
pub fn is_temp_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "tmp")
}

/// Write `bytes` to `target` via a sibling temp file and rename
///
/// The temp file is removed if either step fails.
pub async fn write_atomic(target: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let temp = temp_path_for(target);
    let result = async {
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, target).await
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp).await;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_temp_path_is_sibling() {
        let target = Path::new("/data/docs/bp_chart_1_A_20240101000000.pdf");
        let temp = temp_path_for(target);
        assert_eq!(temp.parent(), target.parent());
        assert!(temp
            .to_string_lossy()
            .starts_with("/data/docs/bp_chart_1_A_20240101000000.pdf."));
        assert!(is_temp_path(&temp));
        assert!(!is_temp_path(target));
    }

    #[tokio::test]
    async fn test_write_atomic_leaves_only_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested").join("out.pdf");
        write_atomic(&target, b"%PDF-1.4").await.unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"%PDF-1.4");
        let entries: Vec<_> = std::fs::read_dir(target.parent().unwrap())
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_write_atomic_cleans_up_on_rename_failure() {
        let dir = TempDir::new().unwrap();
        // Renaming a file over a non-empty directory fails
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep"), b"x").unwrap();

        assert!(write_atomic(&target, b"data").await.is_err());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| is_temp_path(&e.path()))
            .collect();
        assert!(leftovers.is_empty());
    }
}
