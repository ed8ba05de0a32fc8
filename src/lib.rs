//! `consolidador` ingests a directory of heterogeneous spreadsheet exports,
//! normalizes their cell content into a uniform tabular shape, and
//! consolidates them into a single Parquet artifact — with a row-chunked
//! semicolon-CSV fallback when the columnar write fails.
//!
//! ## Supported inputs
//!
//! Candidate files are selected by glob pattern and decoded strictly by
//! extension (case-insensitive):
//!
//! - `.xls` — legacy binary workbooks
//! - `.xlsx`, `.xlsm` — OOXML workbooks
//! - `.xlsb` — binary-streaming workbooks
//!
//! Only the first sheet is read; row 0 is the header row. Every ingested row
//! is tagged with its source file's base name in an added `arquivo_origem`
//! column, and tables with differing column sets are consolidated under
//! explicit outer-union-of-columns semantics.
//!
//! ## Failure isolation
//!
//! Each file is loaded through an explicit `Result`: a file that fails to
//! decode is logged and skipped, never aborting the run. Only a run where no
//! file loads at all fails ([`error::PipelineError::NoValidFiles`]). A failed
//! Parquet write is downgraded to chunked CSV output automatically.
//!
//! ## Quick example
//!
//! ```no_run
//! use consolidador::config::PipelineConfig;
//! use consolidador::observability::StdErrObserver;
//! use consolidador::pipeline;
//!
//! # fn main() -> Result<(), consolidador::error::PipelineError> {
//! let config = PipelineConfig::for_directory("/dados");
//! let report = pipeline::run(&config, &StdErrObserver)?;
//! println!("consolidated {} rows into {:?}", report.rows, report.outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: discovery, per-format decoding, normalization, consolidation
//! - [`persistence`]: Parquet primary write and chunked CSV fallback
//! - [`pipeline`]: top-level run entrypoint
//! - [`table`]: in-memory cell/table model
//! - [`config`]: immutable run configuration
//! - [`observability`]: timestamped status-line observers
//! - [`changelog`]: artifact last-modified records and the document-store boundary
//! - [`error`]: error types used across the pipeline

pub mod changelog;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod observability;
pub mod persistence;
pub mod pipeline;
pub mod table;

pub use config::PipelineConfig;
pub use error::{ChangeLogError, DecodeError, PersistenceError, PipelineError};
pub use persistence::PersistenceOutcome;
pub use table::{Cell, Table};
