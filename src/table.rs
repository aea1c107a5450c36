//! Column-oriented table assembly: header location and materialization.
//!
//! The header row is found by scanning from the top: a row qualifies once at
//! most 3/4 of its cells fail strict canonicalization, which lets free-text
//! title rows and ship-date banners above the real header fall away. The
//! scan is bounded by the input; running out of rows is `NoHeaderFound`,
//! never a read past the end.

use log::debug;

use crate::{
    aliases::AliasTable,
    data::Cell,
    error::ConvertError,
    matching,
    rows::{RawRow, SparseMode},
};

/// One output column: a label (canonical or passed-through) plus the data
/// cells, aligned by row index with every other column in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(label: impl Into<String>) -> Self {
        Column {
            label: label.into(),
            values: Vec::new(),
        }
    }

    pub fn filled(label: impl Into<String>, fill: &str, rows: usize) -> Self {
        Column {
            label: label.into(),
            values: vec![Cell::text(fill); rows],
        }
    }
}

/// A set of columns of uniform length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |col| col.values.len())
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.label.as_str()).collect()
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.label == label)
    }

    /// Rows in output orientation. The header labels are not part of the
    /// output contract; only data rows are emitted.
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        let rows = self.row_count();
        let mut out = Vec::with_capacity(rows);
        for row_idx in 0..rows {
            out.push(
                self.columns
                    .iter()
                    .map(|col| col.values[row_idx].clone())
                    .collect(),
            );
        }
        out
    }
}

/// Index of the first row that is mostly recognizable as a header.
pub fn locate_header(rows: &[RawRow], aliases: &AliasTable) -> Result<usize, ConvertError> {
    for (idx, row) in rows.iter().enumerate() {
        let cells = row.tokenize_unchecked();
        if cells.is_empty() {
            continue;
        }
        let unrecognized = cells
            .iter()
            .filter(|cell| matching::resolve_field(&cell.render(), aliases).is_none())
            .count();
        if unrecognized * 4 > cells.len() * 3 {
            debug!(
                "row {idx}: {unrecognized}/{} cells unrecognized, not a header",
                cells.len()
            );
            continue;
        }
        return Ok(idx);
    }
    Err(ConvertError::NoHeaderFound {
        rows_scanned: rows.len(),
    })
}

/// Assemble raw rows into named columns. Header cells are canonicalized in
/// rewrite mode (unknown headers keep their original label); data rows are
/// appended positionally, with malformed rows dropped on the way.
pub fn materialize(rows: &[RawRow], aliases: &AliasTable) -> Result<Table, ConvertError> {
    let header_idx = locate_header(rows, aliases)?;
    let header_cells = rows[header_idx].tokenize_unchecked();

    let mut columns = header_cells
        .iter()
        .map(|cell| Column::new(matching::canonical_label(&cell.render(), aliases)))
        .collect::<Vec<_>>();
    let width = columns.len();

    let mut dropped = 0usize;
    for (offset, row) in rows[header_idx + 1..].iter().enumerate() {
        let Some(cells) = row.tokenize(SparseMode::Drop) else {
            dropped += 1;
            continue;
        };
        if cells.len() != width {
            debug!(
                "row {}: width {} differs from header width {width}",
                header_idx + 1 + offset,
                cells.len()
            );
        }
        for (idx, column) in columns.iter_mut().enumerate() {
            let cell = cells.get(idx).cloned().unwrap_or_else(|| Cell::text(""));
            column.values.push(cell);
        }
    }
    if dropped > 0 {
        debug!("dropped {dropped} malformed row(s)");
    }

    Ok(Table { columns })
}
