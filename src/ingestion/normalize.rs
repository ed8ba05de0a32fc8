//! Uniform per-column cleaning rules.
//!
//! Two categories of columns are rewritten to text:
//!
//! - columns in the configured force-text set (identifier-like data such as
//!   registration numbers, which must never round-trip through numbers)
//! - "object" columns — any column whose cells are not uniformly numeric or
//!   uniformly boolean (see [`ColumnKind::Textual`])
//!
//! Cleaning coerces each cell to text, strips embedded NUL bytes, and maps
//! both missing values and the literal `"nan"` (a numeric-to-text coercion
//! artifact) to the empty string. Uniformly typed numeric/boolean columns are
//! left untouched. The transformation is deterministic and idempotent.

use crate::config::PipelineConfig;
use crate::table::{Cell, ColumnKind, Table};

/// Normalize `table` in place under the configured cleaning rules.
pub fn normalize(table: &mut Table, config: &PipelineConfig) {
    for idx in 0..table.column_count() {
        let needs_cleaning = config.is_force_text(&table.columns[idx])
            || table.column_kind(idx) == ColumnKind::Textual;
        if !needs_cleaning {
            continue;
        }
        for row in &mut table.rows {
            row[idx] = clean_cell(&row[idx]);
        }
    }
}

fn clean_cell(cell: &Cell) -> Cell {
    let mut text = cell.render();
    if text.contains('\0') {
        text.retain(|ch| ch != '\0');
    }
    if text == "nan" {
        text.clear();
    }
    Cell::Text(text)
}
