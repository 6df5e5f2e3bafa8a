//! Record source abstraction
//!
//! The pipeline never loads records itself; the HTTP surface asks a
//! [`RecordSource`] for an already-validated record by kind and id.

use crate::domain::{EncounterRecord, FormKind, InputError, RecordId, Result, ResultExt};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Lookup of encounter records by kind and id
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load a record, `Ok(None)` if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or decoded.
    async fn load(&self, kind: FormKind, id: RecordId) -> Result<Option<EncounterRecord>>;
}

/// Directory of exported records named `{kind_slug}_{id}.json`
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    dir: PathBuf,
}

impl JsonRecordSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, kind: FormKind, id: RecordId) -> PathBuf {
        self.dir.join(format!("{}_{}.json", kind.slug(), id))
    }
}

/// Read and decode one record file
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or an input error if it
/// is not a valid record.
pub async fn read_record_file(path: &Path) -> Result<EncounterRecord> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(EncounterRecord::from_json(&json)?)
}

#[async_trait]
impl RecordSource for JsonRecordSource {
    async fn load(&self, kind: FormKind, id: RecordId) -> Result<Option<EncounterRecord>> {
        let path = self.path_for(kind, id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }

        let record = read_record_file(&path).await?;
        // A file under the wrong name must not serve another record's identity
        if record.kind() != kind || record.header().id != Some(id) {
            return Err(InputError::InvalidRecord(format!(
                "{} does not contain {kind} #{id}",
                path.display()
            ))
            .into());
        }
        Ok(Some(record))
    }
}
