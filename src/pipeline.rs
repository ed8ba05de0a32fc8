//! Top-level pipeline run: ingest, then persist.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::ingestion;
use crate::observability::PipelineObserver;
use crate::persistence::{self, PersistenceOutcome};

/// Summary of one completed consolidation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Rows in the consolidated table.
    pub rows: usize,
    /// Columns in the consolidated table (including `arquivo_origem`).
    pub columns: usize,
    /// What persistence produced on disk.
    pub outcome: PersistenceOutcome,
}

/// Run the full pipeline: discover, decode, normalize, consolidate, persist.
///
/// Fails with [`PipelineError::NoValidFiles`] when nothing could be ingested;
/// a failed columnar write is handled internally by the chunked fallback and
/// does not surface here.
pub fn run(
    config: &PipelineConfig,
    observer: &dyn PipelineObserver,
) -> Result<PipelineReport, PipelineError> {
    let table = ingestion::load_directory(config, observer)?;
    let outcome = persistence::persist(&table, config, observer)?;
    Ok(PipelineReport {
        rows: table.row_count(),
        columns: table.column_count(),
        outcome,
    })
}
