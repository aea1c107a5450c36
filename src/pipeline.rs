//! Per-file conversion pipeline.
//!
//! One file in, one canonical tab-delimited file (or numbered parts) out:
//! ingest rows, materialize columns, enforce the canonical schema, normalize
//! values, transpose, write. Every stage either succeeds or fails the whole
//! file; nothing is written until the table is fully transformed, so a
//! failed file never produces partial output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    aliases::{self, AliasTable, Profile},
    dates::EpochMode,
    io_utils, normalize,
    rows::RawRow,
    schema::{self, FillPolicy},
    table,
    workbook::{self, WorkbookReader},
};

pub struct ConvertOptions {
    pub fill: FillPolicy,
    pub profiles: Vec<Profile>,
    pub input_encoding: &'static Encoding,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            fill: FillPolicy::default(),
            profiles: aliases::builtin_profiles(),
            input_encoding: UTF_8,
        }
    }
}

#[derive(Debug)]
pub struct ConvertOutcome {
    pub outputs: Vec<PathBuf>,
    pub rows_written: usize,
    pub profile: Option<String>,
}

/// Convert one input file into `output_dir`.
pub fn convert_file(
    input: &Path,
    output_dir: &Path,
    options: &ConvertOptions,
    readers: &[Box<dyn WorkbookReader>],
) -> Result<ConvertOutcome> {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Input path {input:?} has no usable file name"))?;

    let profile = aliases::detect_profile(&options.profiles, stem);
    if let Some(profile) = profile {
        debug!("'{stem}' matched profile '{}'", profile.name);
    }
    let alias_table = match profile {
        Some(profile) => AliasTable::builtin().with_profile(profile),
        None => AliasTable::builtin(),
    };

    let (rows, epoch) = ingest(input, options, readers)?;

    let materialized = table::materialize(&rows, &alias_table)
        .with_context(|| format!("Recognizing columns in {input:?}"))?;
    let mut enforced = schema::enforce(materialized, options.fill)
        .with_context(|| format!("Enforcing canonical schema on {input:?}"))?;
    normalize::normalize(&mut enforced, epoch, options.fill, profile);

    let output_rows = enforced
        .into_rows()
        .into_iter()
        .map(|row| row.iter().map(|cell| cell.render()).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    let stamp = Local::now().date_naive();
    let outputs = io_utils::write_output(&output_rows, output_dir, stem, stamp)
        .with_context(|| format!("Writing output for {input:?}"))?;

    info!(
        "'{}' -> {} row(s) across {} output file(s)",
        input.display(),
        output_rows.len(),
        outputs.len()
    );
    Ok(ConvertOutcome {
        outputs,
        rows_written: output_rows.len(),
        profile: profile.map(|p| p.name.clone()),
    })
}

fn ingest(
    input: &Path,
    options: &ConvertOptions,
    readers: &[Box<dyn WorkbookReader>],
) -> Result<(Vec<RawRow>, EpochMode)> {
    if let Some(reader) = readers.iter().find(|r| r.handles(input)) {
        let book = reader
            .read(input)
            .with_context(|| format!("Decoding workbook {input:?}"))?;
        return Ok((workbook::collect_rows(&book), book.epoch));
    }
    if io_utils::is_workbook_path(input) {
        return Err(anyhow!(
            "No workbook reader available for {input:?}; route to manual handling"
        ));
    }
    let rows = io_utils::read_text_rows(input, options.input_encoding)?;
    Ok((rows, EpochMode::default()))
}
