//! Resilient persistence of the consolidated table.
//!
//! [`persist`] first serializes the whole table to a single Parquet file. If
//! that fails for any reason, the failure is reported and the table is
//! re-written as consecutive row chunks of semicolon-delimited CSV
//! (`fallback_parte_<N>.csv`, `N` from 1). Primary-write errors never
//! propagate; a fallback chunk-write error does.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::basic::{LogicalType, Repetition, Type as PhysicalType};
use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::{SerializedColumnWriter, SerializedFileWriter};
use parquet::schema::types::{Type, TypePtr};

use crate::config::PipelineConfig;
use crate::error::PersistenceError;
use crate::observability::PipelineObserver;
use crate::table::{Cell, ColumnKind, Table};

/// What persistence produced on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceOutcome {
    /// The single columnar artifact was written.
    Columnar(PathBuf),
    /// The columnar write failed; these chunk files were written instead,
    /// in order.
    ChunkedFallback(Vec<PathBuf>),
}

/// Write `table` durably under the configured artifact layout.
///
/// The columnar write is attempted first; on failure the chunked CSV fallback
/// runs automatically. Only a fallback chunk failure is returned as an error —
/// and it aborts the remaining chunks.
pub fn persist(
    table: &Table,
    config: &PipelineConfig,
    observer: &dyn PipelineObserver,
) -> Result<PersistenceOutcome, PersistenceError> {
    let artifact = config.artifact_path();
    match write_parquet(table, &artifact) {
        Ok(()) => {
            observer.on_artifact_written(&artifact, table.row_count());
            Ok(PersistenceOutcome::Columnar(artifact))
        }
        Err(error) => {
            observer.on_primary_failure(&artifact, &error);
            let chunks = write_csv_chunks(table, config, observer)?;
            Ok(PersistenceOutcome::ChunkedFallback(chunks))
        }
    }
}

/// Serialize the full table to one Parquet file at `path`.
///
/// Every column is written OPTIONAL in a single row group: INT64 / DOUBLE /
/// BOOLEAN for uniformly typed columns, UTF-8 BYTE_ARRAY for textual ones.
/// [`Cell::Empty`] becomes a Parquet null.
pub fn write_parquet(table: &Table, path: &Path) -> Result<(), PersistenceError> {
    let schema = parquet_schema(table)?;
    let file = File::create(path)?;
    let props = Arc::new(WriterProperties::builder().build());
    let mut writer = SerializedFileWriter::new(file, schema, props)?;

    let mut row_group = writer.next_row_group()?;
    let mut idx = 0;
    while let Some(mut col) = row_group.next_column()? {
        write_column(table, idx, &mut col)?;
        col.close()?;
        idx += 1;
    }
    row_group.close()?;
    writer.close()?;
    Ok(())
}

fn parquet_schema(table: &Table) -> Result<TypePtr, PersistenceError> {
    let mut fields = Vec::with_capacity(table.column_count());
    for (idx, name) in table.columns.iter().enumerate() {
        let builder = match table.column_kind(idx) {
            ColumnKind::Int => Type::primitive_type_builder(name, PhysicalType::INT64),
            ColumnKind::Float => Type::primitive_type_builder(name, PhysicalType::DOUBLE),
            ColumnKind::Bool => Type::primitive_type_builder(name, PhysicalType::BOOLEAN),
            ColumnKind::Textual => Type::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
                .with_logical_type(Some(LogicalType::String)),
        };
        let field = builder.with_repetition(Repetition::OPTIONAL).build()?;
        fields.push(Arc::new(field));
    }
    let group = Type::group_type_builder("consolidado")
        .with_fields(fields)
        .build()?;
    Ok(Arc::new(group))
}

fn write_column(
    table: &Table,
    idx: usize,
    col: &mut SerializedColumnWriter<'_>,
) -> Result<(), PersistenceError> {
    let row_count = table.row_count();
    match col.untyped() {
        ColumnWriter::Int64ColumnWriter(typed) => {
            let mut values = Vec::new();
            let mut defs = Vec::with_capacity(row_count);
            for cell in table.column_cells(idx) {
                match cell {
                    Cell::Int(v) => {
                        values.push(*v);
                        defs.push(1);
                    }
                    _ => defs.push(0),
                }
            }
            typed.write_batch(&values, Some(&defs), None)?;
        }
        ColumnWriter::DoubleColumnWriter(typed) => {
            let mut values = Vec::new();
            let mut defs = Vec::with_capacity(row_count);
            for cell in table.column_cells(idx) {
                match cell {
                    Cell::Float(v) => {
                        values.push(*v);
                        defs.push(1);
                    }
                    Cell::Int(v) => {
                        values.push(*v as f64);
                        defs.push(1);
                    }
                    _ => defs.push(0),
                }
            }
            typed.write_batch(&values, Some(&defs), None)?;
        }
        ColumnWriter::BoolColumnWriter(typed) => {
            let mut values = Vec::new();
            let mut defs = Vec::with_capacity(row_count);
            for cell in table.column_cells(idx) {
                match cell {
                    Cell::Bool(v) => {
                        values.push(*v);
                        defs.push(1);
                    }
                    _ => defs.push(0),
                }
            }
            typed.write_batch(&values, Some(&defs), None)?;
        }
        ColumnWriter::ByteArrayColumnWriter(typed) => {
            let mut values = Vec::new();
            let mut defs = Vec::with_capacity(row_count);
            for cell in table.column_cells(idx) {
                if cell.is_empty() {
                    defs.push(0);
                } else {
                    values.push(ByteArray::from(cell.render().into_bytes()));
                    defs.push(1);
                }
            }
            typed.write_batch(&values, Some(&defs), None)?;
        }
        _ => {
            return Err(parquet::errors::ParquetError::General(
                "unexpected parquet column writer for table column".to_string(),
            )
            .into());
        }
    }
    Ok(())
}

/// Write the table as consecutive semicolon-delimited CSV chunk files.
///
/// Chunk `N` (1-based) holds rows `[(N-1)*chunk_size, N*chunk_size)` in
/// order, each file with a header row. A chunk-write failure aborts the
/// remaining chunks and propagates.
pub fn write_csv_chunks(
    table: &Table,
    config: &PipelineConfig,
    observer: &dyn PipelineObserver,
) -> Result<Vec<PathBuf>, PersistenceError> {
    let chunk_size = config.chunk_size.max(1);
    let mut paths = Vec::new();
    for (i, rows) in table.rows.chunks(chunk_size).enumerate() {
        let path = config.fallback_chunk_path(i + 1);
        write_csv_chunk(&table.columns, rows, &path)?;
        observer.on_artifact_written(&path, rows.len());
        paths.push(path);
    }
    Ok(paths)
}

fn write_csv_chunk(
    columns: &[String],
    rows: &[Vec<Cell>],
    path: &Path,
) -> Result<(), PersistenceError> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row.iter().map(Cell::render))?;
    }
    writer.flush()?;
    Ok(())
}
