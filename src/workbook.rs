//! Workbook ingestion seam.
//!
//! Binary spreadsheet decoding is not this crate's business: a
//! [`WorkbookReader`] implementation supplies raw cell rows per sheet plus
//! the file's date epoch, and everything downstream is format-agnostic. What
//! is ours is the sheet policy: hidden sheets are skipped outright, the
//! first visible sheet is read whole, and every later visible sheet drops
//! its row 0 as an assumed repeat of the same header.

use std::path::Path;

use anyhow::Result;

use crate::{data::Cell, dates::EpochMode, rows::RawRow};

#[derive(Debug, Clone)]
pub struct Sheet {
    pub visible: bool,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    pub epoch: EpochMode,
}

/// Black-box decoder for legacy spreadsheet containers.
pub trait WorkbookReader {
    /// Whether this reader recognizes the file by path (typically by
    /// extension) and should be handed the bytes.
    fn handles(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> Result<Workbook>;
}

/// Flatten a workbook's visible sheets into one row stream under the
/// repeated-header policy.
pub fn collect_rows(workbook: &Workbook) -> Vec<RawRow> {
    let mut rows = Vec::new();
    let mut seen_visible = false;
    for sheet in &workbook.sheets {
        if !sheet.visible {
            continue;
        }
        let skip = usize::from(seen_visible);
        seen_visible = true;
        rows.extend(
            sheet
                .rows
                .iter()
                .skip(skip)
                .map(|cells| RawRow::Cells(cells.clone())),
        );
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(visible: bool, rows: &[&[&str]]) -> Sheet {
        Sheet {
            visible,
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| Cell::text(*c)).collect())
                .collect(),
        }
    }

    #[test]
    fn hidden_sheets_are_skipped() {
        let workbook = Workbook {
            sheets: vec![
                sheet(false, &[&["ghost header"], &["ghost data"]]),
                sheet(true, &[&["Vendor Id"], &["4711"]]),
            ],
            epoch: EpochMode::Epoch1900,
        };
        let rows = collect_rows(&workbook);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RawRow::Cells(vec![Cell::text("Vendor Id")]));
    }

    #[test]
    fn later_visible_sheets_drop_their_repeated_header() {
        let workbook = Workbook {
            sheets: vec![
                sheet(true, &[&["Vendor Id"], &["4711"]]),
                sheet(true, &[&["Vendor Id"], &["4712"]]),
            ],
            epoch: EpochMode::Epoch1900,
        };
        let rows = collect_rows(&workbook);
        assert_eq!(
            rows,
            vec![
                RawRow::Cells(vec![Cell::text("Vendor Id")]),
                RawRow::Cells(vec![Cell::text("4711")]),
                RawRow::Cells(vec![Cell::text("4712")]),
            ]
        );
    }

    #[test]
    fn first_visible_sheet_keeps_row_zero_even_after_hidden_sheets() {
        let workbook = Workbook {
            sheets: vec![
                sheet(false, &[&["hidden"]]),
                sheet(false, &[&["hidden"]]),
                sheet(true, &[&["Vendor Id"], &["4711"]]),
            ],
            epoch: EpochMode::Epoch1900,
        };
        assert_eq!(collect_rows(&workbook).len(), 2);
    }
}
