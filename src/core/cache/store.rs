//! Artifact cache abstraction
//!
//! The pipeline only talks to [`ArtifactCache`], so a content-hash key or a
//! non-filesystem store can replace [`FsArtifactCache`] without touching it.

use super::atomic::is_temp_path;
use super::path::{record_prefix, ArtifactPaths};
use crate::domain::{ArtifactIdentity, ClinidocError, FormKind, RecordId, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Cache of fixed-layout artifacts keyed by identity
#[async_trait]
pub trait ArtifactCache: Send + Sync {
    /// Location of a ready artifact, if one exists
    async fn get(&self, key: &ArtifactIdentity) -> Option<PathBuf>;

    /// Record `path` as the artifact for `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be stored.
    async fn put(&self, key: &ArtifactIdentity, path: &Path) -> Result<()>;

    /// Drop every artifact belonging to a record, returning how many files went
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be listed.
    async fn invalidate(&self, kind: FormKind, id: RecordId) -> Result<usize>;
}

/// Filesystem cache where a non-empty file at the resolved path is the entry
#[derive(Debug, Clone)]
pub struct FsArtifactCache {
    dir: PathBuf,
}

impl FsArtifactCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn paths(&self, key: &ArtifactIdentity) -> ArtifactPaths {
        ArtifactPaths::resolve(&self.dir, key)
    }
}

/// Whether `path` is a regular, non-empty file
pub async fn is_ready(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}

#[async_trait]
impl ArtifactCache for FsArtifactCache {
    async fn get(&self, key: &ArtifactIdentity) -> Option<PathBuf> {
        let path = self.paths(key).fixed_layout;
        is_ready(&path).await.then_some(path)
    }

    async fn put(&self, key: &ArtifactIdentity, path: &Path) -> Result<()> {
        let target = self.paths(key).fixed_layout;
        if path != target {
            tokio::fs::rename(path, &target).await.map_err(|e| {
                ClinidocError::Io(format!(
                    "Failed to move {} into cache: {e}",
                    path.display()
                ))
            })?;
        }
        if !is_ready(&target).await {
            return Err(ClinidocError::Io(format!(
                "Refusing to cache empty artifact {}",
                target.display()
            )));
        }
        Ok(())
    }

    async fn invalidate(&self, kind: FormKind, id: RecordId) -> Result<usize> {
        let prefix = record_prefix(kind, id);
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(&prefix) {
                continue;
            }
            let path = entry.path();
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    if !is_temp_path(&path) {
                        removed += 1;
                    }
                    tracing::debug!(path = %path.display(), "Removed stale artifact");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale artifact");
                }
            }
        }
        Ok(removed)
    }
}
