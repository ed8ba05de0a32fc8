//! File discovery, per-file loading, and consolidation.
//!
//! [`load_directory`] is the ingestion entrypoint: it discovers candidate
//! files by glob pattern, runs decode + normalize per file, tags every row
//! with its source file's base name, and folds all successfully-read tables
//! into one consolidated [`Table`].
//!
//! Failure isolation: each file is loaded through an explicit
//! `Result<Table, DecodeError>`; a failure is reported to the observer and the
//! file is skipped — one bad file never aborts the run. Only a run where *no*
//! file loads fails, with [`PipelineError::NoValidFiles`].

pub mod decode;
pub mod normalize;

use std::path::{Path, PathBuf};

use crate::config::{PipelineConfig, file_base_name};
use crate::error::{DecodeResult, PipelineError};
use crate::observability::PipelineObserver;
use crate::table::{Cell, Table};

pub use decode::{SourceFormat, decode, decode_as};
pub use normalize::normalize;

/// Name of the provenance column added to every ingested row.
pub const SOURCE_COLUMN: &str = "arquivo_origem";

/// Discover candidate files under `config.directory` matching
/// `config.pattern`, keeping only supported spreadsheet extensions.
///
/// Files with unsupported extensions are silently excluded rather than
/// reported as errors. Discovery order is preserved for the rest of the run.
pub fn discover_files(config: &PipelineConfig) -> Result<Vec<PathBuf>, PipelineError> {
    let pattern = config.directory.join(&config.pattern);
    let mut files = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        // Entries glob cannot stat are skipped, like any other unreadable file.
        let Ok(path) = entry else { continue };
        if SourceFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Decode and normalize one file, then tag every row with the file's base
/// name in the [`SOURCE_COLUMN`] column.
pub fn load_file(path: impl AsRef<Path>, config: &PipelineConfig) -> DecodeResult<Table> {
    let path = path.as_ref();
    let mut table = decode(path)?;
    normalize(&mut table, config);
    table.push_constant_column(SOURCE_COLUMN, Cell::Text(file_base_name(path)));
    Ok(table)
}

/// Ingest every candidate file in the configured directory and consolidate
/// the results into one table.
pub fn load_directory(
    config: &PipelineConfig,
    observer: &dyn PipelineObserver,
) -> Result<Table, PipelineError> {
    let files = discover_files(config)?;
    observer.on_files_discovered(&config.directory, files.len());

    let mut tables: Vec<Table> = Vec::new();
    for path in &files {
        match load_file(path, config) {
            Ok(table) => {
                observer.on_file_success(path, table.row_count());
                tables.push(table);
            }
            Err(error) => observer.on_file_failure(path, &error),
        }
    }

    if tables.is_empty() {
        return Err(PipelineError::NoValidFiles {
            directory: config.directory.clone(),
        });
    }

    let consolidated = consolidate(tables);
    observer.on_consolidated(consolidated.row_count(), consolidated.column_count());
    Ok(consolidated)
}

/// Concatenate tables row-wise under outer-union-of-columns semantics.
///
/// The output column set is the union of all input column names in first-seen
/// order. Cells for columns absent from a contributing table are filled with
/// [`Cell::Empty`]. Row order follows the input table order, and rows within
/// each table keep their original order.
pub fn consolidate(tables: Vec<Table>) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for table in &tables {
        for name in &table.columns {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.clone());
            }
        }
    }

    let total_rows = tables.iter().map(Table::row_count).sum();
    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(total_rows);
    for table in tables {
        let projection: Vec<Option<usize>> =
            columns.iter().map(|c| table.column_index(c)).collect();
        for row in table.rows {
            rows.push(
                projection
                    .iter()
                    .map(|src| match src {
                        Some(idx) => row[*idx].clone(),
                        None => Cell::Empty,
                    })
                    .collect(),
            );
        }
    }

    Table::new(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn consolidate_unions_columns_in_first_seen_order() {
        let a = table(
            &["id", "nome"],
            vec![vec![Cell::Int(1), Cell::Text("ana".into())]],
        );
        let b = table(
            &["id", "idade"],
            vec![vec![Cell::Int(2), Cell::Int(30)]],
        );

        let merged = consolidate(vec![a, b]);
        assert_eq!(merged.columns, vec!["id", "nome", "idade"]);
        assert_eq!(merged.row_count(), 2);
        // absent cells are filled with the missing-value marker
        assert_eq!(merged.rows[0][2], Cell::Empty);
        assert_eq!(merged.rows[1][1], Cell::Empty);
        assert_eq!(merged.rows[1][2], Cell::Int(30));
    }

    #[test]
    fn consolidate_preserves_per_table_row_order() {
        let a = table(&["n"], vec![vec![Cell::Int(1)], vec![Cell::Int(2)]]);
        let b = table(&["n"], vec![vec![Cell::Int(3)]]);

        let merged = consolidate(vec![a, b]);
        let values: Vec<&Cell> = merged.column_cells(0).collect();
        assert_eq!(values, vec![&Cell::Int(1), &Cell::Int(2), &Cell::Int(3)]);
    }
}
