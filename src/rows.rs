//! Row tokenization and sparseness validation.
//!
//! Text lines are split on a best-guess delimiter: a line with more tabs
//! than commas is tab-delimited, anything else goes through quoted-field
//! comma parsing. Every field is then trimmed and stripped of embedded
//! quotes. A row where at least 3/4 of the fields end up empty is too
//! sparse to be real data and is dropped, unless the caller is hunting for
//! the header row, where legitimately sparse rows must survive the scan.
//!
//! Workbook rows arrive pre-split and skip the delimiter step but get the
//! same cleaning and the same sparseness rule.

use crate::data::Cell;

/// What to do with a row that fails the 3/4-empty rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SparseMode {
    /// Normal data path: sparse rows are malformed, return `None`.
    Drop,
    /// Header-scan override: keep the row regardless of sparseness.
    Keep,
}

/// Tokenize one raw text line. `None` means the row is malformed and must be
/// dropped by the caller.
pub fn tokenize_line(line: &str, mode: SparseMode) -> Option<Vec<Cell>> {
    let line = line.trim_end_matches(['\n', '\r']);
    let fields = if line.matches('\t').count() > line.matches(',').count() {
        line.split('\t').map(|f| f.to_string()).collect()
    } else {
        split_comma_quoted(line)
    };
    let cells = fields.into_iter().map(Cell::Text).collect::<Vec<_>>();
    apply_sparse_rule(cells, mode)
}

/// Clean and validate a pre-split row (the workbook path).
pub fn validate_cells(cells: Vec<Cell>, mode: SparseMode) -> Option<Vec<Cell>> {
    apply_sparse_rule(cells, mode)
}

fn apply_sparse_rule(cells: Vec<Cell>, mode: SparseMode) -> Option<Vec<Cell>> {
    let cleaned = cells.iter().map(Cell::cleaned).collect::<Vec<_>>();
    let empty = cleaned.iter().filter(|cell| cell.is_blank()).count();
    if mode == SparseMode::Drop && empty * 4 >= cleaned.len() * 3 {
        return None;
    }
    Some(cleaned)
}

/// One input row before tokenization: either a raw text line or a pre-split
/// cell row from a workbook reader.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    Line(String),
    Cells(Vec<Cell>),
}

impl RawRow {
    pub fn line(text: impl Into<String>) -> Self {
        RawRow::Line(text.into())
    }

    pub fn tokenize(&self, mode: SparseMode) -> Option<Vec<Cell>> {
        match self {
            RawRow::Line(text) => tokenize_line(text, mode),
            RawRow::Cells(cells) => validate_cells(cells.clone(), mode),
        }
    }

    /// Tokenization for header scanning; the override mode never drops a
    /// row, so this always yields the cells.
    pub fn tokenize_unchecked(&self) -> Vec<Cell> {
        self.tokenize(SparseMode::Keep).unwrap_or_default()
    }
}

/// Comma splitting that honors quoted fields, so `"Acme, Inc."` stays one
/// field. Falls back to a plain split when the line is not parseable CSV.
fn split_comma_quoted(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(|f| f.to_string()).collect(),
        _ => line.split(',').map(|f| f.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(cells: &[Cell]) -> Vec<String> {
        cells.iter().map(Cell::render).collect()
    }

    #[test]
    fn prefers_tab_when_tabs_outnumber_commas() {
        let row = tokenize_line("Acme\t100\t2015-01-01\n", SparseMode::Drop).unwrap();
        assert_eq!(texts(&row), ["Acme", "100", "2015-01-01"]);
    }

    #[test]
    fn comma_split_keeps_quoted_commas_together() {
        let row = tokenize_line("\"Acme, Inc.\",4711,250.00", SparseMode::Drop).unwrap();
        assert_eq!(texts(&row), ["Acme, Inc.", "4711", "250.00"]);
    }

    #[test]
    fn fields_are_trimmed_and_dequoted() {
        let row = tokenize_line(" Acme , \"4711\" ,  250.00 \n", SparseMode::Drop).unwrap();
        assert_eq!(texts(&row), ["Acme", "4711", "250.00"]);
    }

    #[test]
    fn sparse_rows_are_dropped_at_the_three_quarters_line() {
        // One of four non-empty: at the 3/4-empty line, dropped.
        assert!(tokenize_line(",,,x", SparseMode::Drop).is_none());
        // Three of four non-empty: kept.
        assert!(tokenize_line("a,,c,d", SparseMode::Drop).is_some());
        // Two of four non-empty: below the line, kept.
        assert!(tokenize_line("a,,c,", SparseMode::Drop).is_some());
    }

    #[test]
    fn header_scan_override_keeps_sparse_rows() {
        let row = tokenize_line(",,,x", SparseMode::Keep).unwrap();
        assert_eq!(row.len(), 4);
    }

    #[test]
    fn workbook_rows_follow_the_same_rule() {
        let sparse = vec![
            Cell::text(""),
            Cell::text(" "),
            Cell::text(""),
            Cell::text("x"),
        ];
        assert!(validate_cells(sparse.clone(), SparseMode::Drop).is_none());
        assert!(validate_cells(sparse, SparseMode::Keep).is_some());

        let numeric = vec![Cell::text(""), Cell::Number(0.0), Cell::text(""), Cell::text("")];
        // Numbers count as populated.
        assert!(validate_cells(numeric, SparseMode::Keep).is_some());
    }
}
