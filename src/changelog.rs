//! Artifact change records and the document-store boundary.
//!
//! A [`ChangeRecord`] captures the columnar artifact's last-modification
//! timestamp. Where the record ends up is a collaborator concern behind
//! [`ChangeLogStore`] — a remote document store implements the same trait as
//! the local [`JsonLinesStore`] shipped here.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::ChangeLogError;

/// One change-log document: artifact path plus last-modification timestamp,
/// both as a full timestamp and as a `YYYY-MM-DD` string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeRecord {
    pub file_path: String,
    pub last_modified: DateTime<Local>,
    pub last_modified_str: String,
}

/// Build a change record from the artifact's filesystem mtime.
///
/// A missing artifact is [`ChangeLogError::ArtifactMissing`]; no record is
/// produced for an artifact that was never written.
pub fn change_record(artifact: impl AsRef<Path>) -> Result<ChangeRecord, ChangeLogError> {
    let artifact = artifact.as_ref();
    let metadata = std::fs::metadata(artifact).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ChangeLogError::ArtifactMissing {
                path: artifact.to_path_buf(),
            }
        } else {
            ChangeLogError::Io(e)
        }
    })?;

    let last_modified: DateTime<Local> = metadata.modified()?.into();
    Ok(ChangeRecord {
        file_path: artifact.display().to_string(),
        last_modified,
        last_modified_str: last_modified.format("%Y-%m-%d").to_string(),
    })
}

/// Destination for change records.
///
/// One document is consumed per invocation; documents are keyed by insertion
/// order and no uniqueness is enforced.
pub trait ChangeLogStore {
    /// Insert one record, returning its insertion id.
    fn insert(&self, record: &ChangeRecord) -> Result<String, ChangeLogError>;
}

/// A local store appending one JSON document per line.
#[derive(Debug)]
pub struct JsonLinesStore {
    path: PathBuf,
    inserted: Mutex<u64>,
}

impl JsonLinesStore {
    /// Create a store appending to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            inserted: Mutex::new(0),
        }
    }
}

impl ChangeLogStore for JsonLinesStore {
    fn insert(&self, record: &ChangeRecord) -> Result<String, ChangeLogError> {
        let line = serde_json::to_string(record)?;
        let mut inserted = self
            .inserted
            .lock()
            .map_err(|_| ChangeLogError::Store("store lock poisoned".to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        *inserted += 1;
        Ok(inserted.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_yields_artifact_missing() {
        let err = change_record("/definitely/missing/consolidado.parquet").unwrap_err();
        assert!(matches!(err, ChangeLogError::ArtifactMissing { .. }));
    }

    #[test]
    fn record_dates_are_consistent() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!(
            "consolidador-changelog-{}.parquet",
            std::process::id()
        ));
        std::fs::write(&path, b"x").unwrap();

        let record = change_record(&path).unwrap();
        assert_eq!(
            record.last_modified_str,
            record.last_modified.format("%Y-%m-%d").to_string()
        );
        assert_eq!(record.file_path, path.display().to_string());

        let _ = std::fs::remove_file(&path);
    }
}
