//! Pipeline status reporting.
//!
//! Every stage reports progress through a [`PipelineObserver`]; the pipeline
//! never depends on where the lines end up. [`StdErrObserver`] and
//! [`FileObserver`] emit timestamped human-readable status lines (with ✓/✗
//! markers for success/failure), and [`CompositeObserver`] fans out to several
//! destinations at once.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{DecodeError, PersistenceError};

/// Observer interface for pipeline progress and outcomes.
///
/// All methods default to no-ops, so implementors only handle the events they
/// care about.
pub trait PipelineObserver: Send + Sync {
    /// Candidate files were discovered in the input directory.
    fn on_files_discovered(&self, _directory: &Path, _count: usize) {}

    /// One file was decoded and normalized successfully.
    fn on_file_success(&self, _path: &Path, _rows: usize) {}

    /// One file failed to decode and will be skipped.
    fn on_file_failure(&self, _path: &Path, _error: &DecodeError) {}

    /// All per-file tables were folded into the consolidated table.
    fn on_consolidated(&self, _rows: usize, _columns: usize) {}

    /// The primary columnar write failed; the chunked fallback will run.
    fn on_primary_failure(&self, _path: &Path, _error: &PersistenceError) {}

    /// An output artifact (the columnar file or one fallback chunk) was written.
    fn on_artifact_written(&self, _path: &Path, _rows: usize) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_files_discovered(&self, directory: &Path, count: usize) {
        for o in &self.observers {
            o.on_files_discovered(directory, count);
        }
    }

    fn on_file_success(&self, path: &Path, rows: usize) {
        for o in &self.observers {
            o.on_file_success(path, rows);
        }
    }

    fn on_file_failure(&self, path: &Path, error: &DecodeError) {
        for o in &self.observers {
            o.on_file_failure(path, error);
        }
    }

    fn on_consolidated(&self, rows: usize, columns: usize) {
        for o in &self.observers {
            o.on_consolidated(rows, columns);
        }
    }

    fn on_primary_failure(&self, path: &Path, error: &PersistenceError) {
        for o in &self.observers {
            o.on_primary_failure(path, error);
        }
    }

    fn on_artifact_written(&self, path: &Path, rows: usize) {
        for o in &self.observers {
            o.on_artifact_written(path, rows);
        }
    }
}

fn status_line(message: &str) -> String {
    format!("[{}] {message}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))
}

fn discovered_line(directory: &Path, count: usize) -> String {
    status_line(&format!("{count} files found in {}", directory.display()))
}

fn file_success_line(path: &Path, rows: usize) -> String {
    status_line(&format!("✓ {}: {rows} rows read", path.display()))
}

fn file_failure_line(path: &Path, error: &DecodeError) -> String {
    status_line(&format!("✗ failed to read {}: {error}", path.display()))
}

fn consolidated_line(rows: usize, columns: usize) -> String {
    status_line(&format!("consolidated table: {rows} rows, {columns} columns"))
}

fn primary_failure_line(path: &Path, error: &PersistenceError) -> String {
    status_line(&format!(
        "✗ parquet write failed for {}: {error} — falling back to chunked csv",
        path.display()
    ))
}

fn artifact_line(path: &Path, rows: usize) -> String {
    status_line(&format!("✓ wrote {} ({rows} rows)", path.display()))
}

/// Logs timestamped status lines to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PipelineObserver for StdErrObserver {
    fn on_files_discovered(&self, directory: &Path, count: usize) {
        eprintln!("{}", discovered_line(directory, count));
    }

    fn on_file_success(&self, path: &Path, rows: usize) {
        eprintln!("{}", file_success_line(path, rows));
    }

    fn on_file_failure(&self, path: &Path, error: &DecodeError) {
        eprintln!("{}", file_failure_line(path, error));
    }

    fn on_consolidated(&self, rows: usize, columns: usize) {
        eprintln!("{}", consolidated_line(rows, columns));
    }

    fn on_primary_failure(&self, path: &Path, error: &PersistenceError) {
        eprintln!("{}", primary_failure_line(path, error));
    }

    fn on_artifact_written(&self, path: &Path, rows: usize) {
        eprintln!("{}", artifact_line(path, rows));
    }
}

/// Appends timestamped status lines to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends lines to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_files_discovered(&self, directory: &Path, count: usize) {
        self.append_line(&discovered_line(directory, count));
    }

    fn on_file_success(&self, path: &Path, rows: usize) {
        self.append_line(&file_success_line(path, rows));
    }

    fn on_file_failure(&self, path: &Path, error: &DecodeError) {
        self.append_line(&file_failure_line(path, error));
    }

    fn on_consolidated(&self, rows: usize, columns: usize) {
        self.append_line(&consolidated_line(rows, columns));
    }

    fn on_primary_failure(&self, path: &Path, error: &PersistenceError) {
        self.append_line(&primary_failure_line(path, error));
    }

    fn on_artifact_written(&self, path: &Path, rows: usize) {
        self.append_line(&artifact_line(path, rows));
    }
}
