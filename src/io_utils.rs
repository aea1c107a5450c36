//! File I/O: encoded text ingestion and chunked tab-delimited output.
//!
//! Input text files are decoded through `encoding_rs` (UTF-8 unless
//! overridden); a file that fails to decode is a file-level failure for the
//! batch driver to route. Output is one tab-delimited `.txt` per input,
//! named with the source stem plus the processing date, split into numbered
//! parts past the row limit the downstream loader accepts.

use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

use crate::rows::RawRow;

/// Downstream ingest rejects larger files; outputs split at this many rows.
pub const CHUNK_ROWS: usize = 125_000;

const WORKBOOK_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm"];

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn is_workbook_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|wb| ext.eq_ignore_ascii_case(wb))
        })
}

/// Read a delimited text file into raw rows, one per line.
pub fn read_text_rows(path: &Path, encoding: &'static Encoding) -> Result<Vec<RawRow>> {
    let mut bytes = Vec::new();
    File::open(path)
        .with_context(|| format!("Opening input file {path:?}"))?
        .read_to_end(&mut bytes)
        .with_context(|| format!("Reading input file {path:?}"))?;
    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(anyhow!(
            "Failed to decode {path:?} with encoding {}",
            encoding.name()
        ));
    }
    Ok(text.lines().map(RawRow::line).collect())
}

/// Write output rows as tab-delimited text under `output_dir`, chunking at
/// [`CHUNK_ROWS`]. Returns the created paths; on any write error the
/// partially written files are removed before the error propagates, so a
/// failed file never leaves output behind.
pub fn write_output(
    rows: &[Vec<String>],
    output_dir: &Path,
    stem: &str,
    stamp: NaiveDate,
) -> Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    let result = write_output_inner(rows, output_dir, stem, stamp, &mut created);
    if result.is_err() {
        for path in &created {
            let _ = fs::remove_file(path);
        }
    }
    result.map(|()| created)
}

fn write_output_inner(
    rows: &[Vec<String>],
    output_dir: &Path,
    stem: &str,
    stamp: NaiveDate,
    created: &mut Vec<PathBuf>,
) -> Result<()> {
    let date = stamp.format("%m.%d.%y");
    let chunks: Vec<&[Vec<String>]> = if rows.len() <= CHUNK_ROWS {
        vec![rows]
    } else {
        rows.chunks(CHUNK_ROWS).collect()
    };
    let single = chunks.len() == 1;
    for (idx, chunk) in chunks.iter().enumerate() {
        let name = if single {
            format!("{stem} ({date}).txt")
        } else {
            format!("{stem} ({date}){}.txt", idx + 1)
        };
        let path = output_dir.join(name);
        write_chunk(chunk, &path)?;
        created.push(path);
    }
    Ok(())
}

fn write_chunk(rows: &[Vec<String>], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Necessary)
        .from_path(path)
        .with_context(|| format!("Creating output file {path:?}"))?;
    for row in rows {
        writer
            .write_record(row.iter())
            .with_context(|| format!("Writing output row to {path:?}"))?;
    }
    writer
        .flush()
        .with_context(|| format!("Flushing output file {path:?}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn workbook_paths_match_by_extension() {
        assert!(is_workbook_path(Path::new("export.xls")));
        assert!(is_workbook_path(Path::new("EXPORT.XLSX")));
        assert!(!is_workbook_path(Path::new("export.txt")));
        assert!(!is_workbook_path(Path::new("export")));
    }

    #[test]
    fn text_rows_preserve_line_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "a,b,c\nd,e,f\n").unwrap();
        let rows = read_text_rows(&path, UTF_8).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RawRow::line("a,b,c"));
    }

    #[test]
    fn output_is_tab_delimited_and_date_stamped() {
        let dir = tempdir().unwrap();
        let stamp = NaiveDate::from_ymd_opt(2016, 3, 7).unwrap();
        let rows = vec![
            vec!["Acme".to_string(), "4711".to_string()],
            vec!["Globex".to_string(), "4712".to_string()],
        ];
        let created = write_output(&rows, dir.path(), "export", stamp).unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(
            created[0].file_name().unwrap().to_str().unwrap(),
            "export (03.07.16).txt"
        );
        let contents = fs::read_to_string(&created[0]).unwrap();
        assert_eq!(contents, "Acme\t4711\nGlobex\t4712\n");
    }

    #[test]
    fn oversized_output_splits_into_numbered_parts() {
        let dir = tempdir().unwrap();
        let stamp = NaiveDate::from_ymd_opt(2016, 3, 7).unwrap();
        let rows = vec![vec!["x".to_string()]; CHUNK_ROWS + 1];
        let created = write_output(&rows, dir.path(), "big", stamp).unwrap();
        assert_eq!(created.len(), 2);
        assert!(
            created[0]
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .ends_with("1.txt")
        );
        assert!(
            created[1]
                .file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .ends_with("2.txt")
        );
    }
}
