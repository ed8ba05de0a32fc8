//! In-memory tabular model shared by every pipeline stage.
//!
//! Decoding produces a [`Table`] per spreadsheet file; normalization rewrites
//! its cells in place; consolidation folds many tables into one. Cells are
//! deliberately untyped beyond [`Cell`]'s scalar variants — the pipeline does
//! no schema inference, it only flattens.

use std::fmt;

/// A single scalar cell value.
///
/// [`Cell::Empty`] is the canonical missing-value marker: it stands in for
/// absent cells, explicit blanks, and cells filled in during schema-union
/// consolidation.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Missing/absent value.
    Empty,
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float (also carries Excel datetime serials from legacy files).
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 text.
    Text(String),
}

impl Cell {
    /// Render this cell as text.
    ///
    /// Integral floats render without a fractional part (`12345.0` →
    /// `"12345"`), so identifier-like numbers survive text coercion intact.
    /// The integer path is taken only for values exactly representable in
    /// i64; everything else uses the float's own rendering, never saturated
    /// digits. [`Cell::Empty`] renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => {
                // `as i64` saturates; restrict to [-2^63, 2^63) where the
                // cast is exact.
                if f.fract() == 0.0
                    && *f >= i64::MIN as f64
                    && *f < i64::MAX as f64
                {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Cell::Bool(b) => b.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    /// True when this cell is the missing-value marker.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Storage classification of one column, computed over its current cells.
///
/// Mirrors the distinction a dataframe engine draws between typed columns and
/// "object" columns: only uniformly numeric or uniformly boolean columns count
/// as typed; everything else (text, mixed, all-empty) is textual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every non-empty cell is `Int`.
    Int,
    /// Every non-empty cell is `Int` or `Float`, with at least one `Float`.
    Float,
    /// Every non-empty cell is `Bool`.
    Bool,
    /// Anything else: text cells, mixed scalar types, or no non-empty cells.
    Textual,
}

/// An ordered set of named columns with row-major cell storage.
///
/// Invariant: every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Row-major cell storage, aligned with `columns`.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create a table from column names and rows.
    ///
    /// # Panics
    ///
    /// Panics if any row's length differs from the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        for (idx, row) in rows.iter().enumerate() {
            assert!(
                row.len() == columns.len(),
                "row {idx} has {} cells but the table has {} columns",
                row.len(),
                columns.len()
            );
        }
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a column with the same `value` in every row.
    ///
    /// Used by the ingestor to tag each row with its originating file name.
    pub fn push_constant_column(&mut self, name: impl Into<String>, value: Cell) {
        self.columns.push(name.into());
        for row in &mut self.rows {
            row.push(value.clone());
        }
    }

    /// Classify the storage kind of column `idx` from its current cells.
    pub fn column_kind(&self, idx: usize) -> ColumnKind {
        let mut saw_int = false;
        let mut saw_float = false;
        let mut saw_bool = false;
        let mut saw_other = false;

        for row in &self.rows {
            match &row[idx] {
                Cell::Empty => {}
                Cell::Int(_) => saw_int = true,
                Cell::Float(_) => saw_float = true,
                Cell::Bool(_) => saw_bool = true,
                Cell::Text(_) => saw_other = true,
            }
        }

        if saw_other {
            return ColumnKind::Textual;
        }
        match (saw_int, saw_float, saw_bool) {
            (_, true, false) => ColumnKind::Float,
            (true, false, false) => ColumnKind::Int,
            (false, false, true) => ColumnKind::Bool,
            // Mixed bool+numeric, or a column with no non-empty cells.
            _ => ColumnKind::Textual,
        }
    }

    /// Iterate the cells of column `idx`, top to bottom.
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn render_integral_float_drops_fraction() {
        assert_eq!(Cell::Float(12345.0).render(), "12345");
        assert_eq!(Cell::Float(1.5).render(), "1.5");
        assert_eq!(Cell::Empty.render(), "");
    }

    #[test]
    fn render_out_of_i64_range_float_keeps_its_own_digits() {
        // A saturating cast would turn these into i64::MAX/i64::MIN digits.
        assert_eq!(Cell::Float(1e20).render(), 1e20_f64.to_string());
        assert_ne!(Cell::Float(1e20).render(), i64::MAX.to_string());
        assert_eq!(Cell::Float(-1e300).render(), (-1e300_f64).to_string());

        // 2^63 sits just past i64::MAX and must not round-trip through it.
        let two_pow_63 = 9_223_372_036_854_775_808.0_f64;
        assert_eq!(Cell::Float(two_pow_63).render(), two_pow_63.to_string());
        assert_ne!(Cell::Float(two_pow_63).render(), i64::MAX.to_string());
        // i64::MIN itself is exactly representable and stays on the int path.
        assert_eq!(
            Cell::Float(i64::MIN as f64).render(),
            i64::MIN.to_string()
        );
    }

    #[test]
    fn column_kind_classifies_uniform_and_mixed_columns() {
        let table = t(
            &["a", "b", "c", "d", "e"],
            vec![
                vec![
                    Cell::Int(1),
                    Cell::Float(1.0),
                    Cell::Bool(true),
                    Cell::Text("x".into()),
                    Cell::Empty,
                ],
                vec![
                    Cell::Empty,
                    Cell::Int(2),
                    Cell::Empty,
                    Cell::Int(3),
                    Cell::Empty,
                ],
            ],
        );

        assert_eq!(table.column_kind(0), ColumnKind::Int);
        assert_eq!(table.column_kind(1), ColumnKind::Float);
        assert_eq!(table.column_kind(2), ColumnKind::Bool);
        assert_eq!(table.column_kind(3), ColumnKind::Textual);
        // all-empty columns are textual (object-like)
        assert_eq!(table.column_kind(4), ColumnKind::Textual);
    }

    #[test]
    fn push_constant_column_extends_every_row() {
        let mut table = t(&["a"], vec![vec![Cell::Int(1)], vec![Cell::Int(2)]]);
        table.push_constant_column("origem", Cell::Text("f.xlsx".into()));

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.rows[0][1], Cell::Text("f.xlsx".into()));
        assert_eq!(table.rows[1][1], Cell::Text("f.xlsx".into()));
    }

    #[test]
    #[should_panic(expected = "has 1 cells")]
    fn new_rejects_ragged_rows() {
        t(&["a", "b"], vec![vec![Cell::Int(1)]]);
    }
}
