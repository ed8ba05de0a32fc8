use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for decoding a single spreadsheet file.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Error decoding one spreadsheet file.
///
/// A `DecodeError` never aborts a whole ingestion run: the ingestor logs it and
/// skips the offending file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file extension is not one of `.xls`, `.xlsx`, `.xlsm`, `.xlsb`.
    ///
    /// Raised before any file I/O is attempted.
    #[error("unsupported spreadsheet extension '{extension}' ({})", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The underlying spreadsheet engine failed to parse the file
    /// (corruption, wrong format despite extension, unsupported structure).
    #[error("failed to decode {}: {source}", .path.display())]
    Engine {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The workbook contains no sheets at all.
    #[error("workbook has no sheets ({})", .path.display())]
    NoSheets { path: PathBuf },

    /// The first sheet has no rows, so there is no header row to read.
    #[error("first sheet has no header row ({})", .path.display())]
    EmptySheet { path: PathBuf },
}

impl DecodeError {
    /// Wrap a spreadsheet-engine error together with the offending path.
    pub fn engine(path: impl Into<PathBuf>, source: impl Into<calamine::Error>) -> Self {
        Self::Engine {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Error produced by the ingestion/consolidation pipeline as a whole.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The configured filename pattern is not a valid glob.
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Every candidate file failed to decode (or no candidate existed).
    ///
    /// Fatal: no output is produced and no fallback is attempted.
    #[error("no valid spreadsheet files were loaded from {}", .directory.display())]
    NoValidFiles { directory: PathBuf },

    /// Fallback chunk writing failed after the primary columnar write already
    /// failed. Primary-write errors never surface here; they only trigger the
    /// fallback.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Error writing the consolidated table to disk.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Columnar (Parquet) serialization failed.
    #[error("parquet write failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A delimited-text chunk write failed.
    #[error("csv chunk write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying I/O error (disk full, permissions, target is a directory).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error building or storing an artifact change record.
#[derive(Debug, Error)]
pub enum ChangeLogError {
    /// The columnar artifact does not exist yet, so it has no mtime to record.
    #[error("artifact not found: {}", .path.display())]
    ArtifactMissing { path: PathBuf },

    /// Underlying I/O error while reading file metadata or appending records.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The record could not be serialized for storage.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backing document store rejected the insertion.
    #[error("store error: {0}")]
    Store(String),
}
