//! Per-format spreadsheet decoding.
//!
//! [`decode`] turns one file into a [`Table`]: dispatch is strictly by
//! lower-cased file extension onto a closed [`SourceFormat`] variant, each
//! backed by the matching calamine reader. Only the first sheet is read; row 0
//! is the header row, rows 1..N are data. Values are carried as the engine
//! reports them — no numeric or date coercion happens here.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Xls, Xlsb, Xlsx, open_workbook};

use crate::error::{DecodeError, DecodeResult};
use crate::table::{Cell, Table};

/// Recognized spreadsheet formats, derived solely from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Legacy binary workbook (`.xls`).
    LegacyBinary,
    /// OOXML workbook (`.xlsx`, `.xlsm`).
    Ooxml,
    /// Binary-streaming workbook (`.xlsb`).
    BinaryStream,
}

impl SourceFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xls" => Some(Self::LegacyBinary),
            "xlsx" | "xlsm" => Some(Self::Ooxml),
            "xlsb" => Some(Self::BinaryStream),
            _ => None,
        }
    }

    /// Parse a format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Decode one spreadsheet file into a [`Table`].
///
/// Fails with [`DecodeError::UnsupportedFormat`] — before any file I/O — when
/// the extension is not recognized. Engine failures are wrapped with the
/// offending path; no partial table is ever returned.
pub fn decode(path: impl AsRef<Path>) -> DecodeResult<Table> {
    let path = path.as_ref();
    let format =
        SourceFormat::from_path(path).ok_or_else(|| DecodeError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })?;
    decode_as(path, format)
}

/// Decode `path` as an already-determined [`SourceFormat`].
pub fn decode_as(path: impl AsRef<Path>, format: SourceFormat) -> DecodeResult<Table> {
    let path = path.as_ref();
    let range = match format {
        SourceFormat::LegacyBinary => first_sheet_range::<Xls<_>>(path)?,
        SourceFormat::Ooxml => first_sheet_range::<Xlsx<_>>(path)?,
        SourceFormat::BinaryStream => first_sheet_range::<Xlsb<_>>(path)?,
    };
    table_from_range(path, &range)
}

fn first_sheet_range<R>(path: &Path) -> DecodeResult<Range<Data>>
where
    R: Reader<BufReader<File>>,
    R::Error: Into<calamine::Error>,
{
    let mut workbook: R = open_workbook(path).map_err(|e| DecodeError::engine(path, e))?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DecodeError::NoSheets {
            path: path.to_path_buf(),
        })?;
    workbook
        .worksheet_range(&first)
        .map_err(|e| DecodeError::engine(path, e))
}

fn table_from_range(path: &Path, range: &Range<Data>) -> DecodeResult<Table> {
    let mut rows = range.rows();
    let header = rows.next().ok_or_else(|| DecodeError::EmptySheet {
        path: path.to_path_buf(),
    })?;

    let columns =
        disambiguate_headers(header.iter().map(|c| cell_from_data(c).render()).collect());
    let data_rows: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Ok(Table::new(columns, data_rows))
}

/// Make repeated header names unique by suffixing later occurrences
/// (`Nome`, `Nome.1`, `Nome.2`, ...).
///
/// Consolidation matches columns by name, so a sheet with duplicate headers
/// would otherwise lose every column after the first.
fn disambiguate_headers(raw: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(raw.len());
    for name in raw {
        if !names.iter().any(|n| *n == name) {
            names.push(name);
            continue;
        }
        let mut n = 1usize;
        loop {
            let candidate = format!("{name}.{n}");
            if !names.iter().any(|c| *c == candidate) {
                names.push(candidate);
                break;
            }
            n += 1;
        }
    }
    names
}

fn cell_from_data(c: &Data) -> Cell {
    match c {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        // Legacy/serial datetimes stay as raw serial numbers, ISO variants as text.
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        // CellErrorType's Display is the sheet-level literal ("#DIV/0!", "#N/A").
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_dispatch_is_case_insensitive() {
        assert_eq!(SourceFormat::from_extension("XLS"), Some(SourceFormat::LegacyBinary));
        assert_eq!(SourceFormat::from_extension("xlsx"), Some(SourceFormat::Ooxml));
        assert_eq!(SourceFormat::from_extension("XlsM"), Some(SourceFormat::Ooxml));
        assert_eq!(SourceFormat::from_extension("xlsb"), Some(SourceFormat::BinaryStream));
        assert_eq!(SourceFormat::from_extension("csv"), None);
        assert_eq!(SourceFormat::from_extension(""), None);
    }

    #[test]
    fn error_cells_render_as_sheet_literals() {
        use calamine::CellErrorType;

        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::Div0)),
            Cell::Text("#DIV/0!".into())
        );
        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::NA)),
            Cell::Text("#N/A".into())
        );
        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::Ref)),
            Cell::Text("#REF!".into())
        );
    }

    #[test]
    fn duplicate_headers_get_numbered_suffixes() {
        let names = disambiguate_headers(vec![
            "Nome".into(),
            "CNS".into(),
            "Nome".into(),
            "Nome".into(),
            "".into(),
            "".into(),
        ]);
        assert_eq!(names, ["Nome", "CNS", "Nome.1", "Nome.2", "", ".1"]);

        // a pre-existing suffixed name is not clobbered
        let names =
            disambiguate_headers(vec!["a".into(), "a.1".into(), "a".into(), "a".into()]);
        assert_eq!(names, ["a", "a.1", "a.2", "a.3"]);
    }

    #[test]
    fn unsupported_extension_fails_before_io() {
        // The path does not exist; an UnsupportedFormat (not an I/O error)
        // proves the extension check happens before any file read.
        let err = decode("/definitely/missing/export.txt").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat { ref extension, .. } if extension == "txt"));

        let err = decode("/definitely/missing/no_extension").unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedFormat { ref extension, .. } if extension.is_empty()));
    }
}
