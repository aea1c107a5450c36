//! Batch driver: walk the source directory, convert each file, route
//! failures, clean up.
//!
//! Files are fully independent: a failure anywhere in one file's pipeline
//! copies that raw file unmodified into the problem directory and the batch
//! moves on. Source files are deleted only after the whole batch finishes,
//! and only the ones that converted cleanly.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};

use crate::{
    aliases,
    cli::BatchArgs,
    io_utils,
    pipeline::{self, ConvertOptions},
    workbook::WorkbookReader,
};

pub fn execute(args: &BatchArgs) -> Result<()> {
    execute_with_readers(args, &[])
}

/// Entry point for embedders that bring their own workbook decoder.
pub fn execute_with_readers(args: &BatchArgs, readers: &[Box<dyn WorkbookReader>]) -> Result<()> {
    fs::create_dir_all(&args.target)
        .with_context(|| format!("Creating target directory {:?}", args.target))?;
    fs::create_dir_all(&args.problem)
        .with_context(|| format!("Creating problem directory {:?}", args.problem))?;

    let options = ConvertOptions {
        fill: args.fill.to_policy(),
        profiles: resolve_profiles(args.profiles.as_deref())?,
        input_encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    };

    let inputs = list_files(&args.source)?;
    info!(
        "Processing {} file(s) from '{}'",
        inputs.len(),
        args.source.display()
    );

    let mut converted = Vec::new();
    let mut routed = 0usize;
    for input in &inputs {
        match pipeline::convert_file(input, &args.target, &options, readers) {
            Ok(_) => converted.push(input.clone()),
            Err(err) => {
                warn!("'{}' failed: {err:#}", input.display());
                // Routing is best-effort; a copy failure must not take the
                // rest of the batch down with it.
                match route_to_problem(input, &args.problem) {
                    Ok(()) => routed += 1,
                    Err(route_err) => {
                        warn!("could not route '{}': {route_err:#}", input.display());
                    }
                }
            }
        }
    }

    if !args.keep_sources {
        for input in &converted {
            fs::remove_file(input)
                .with_context(|| format!("Removing converted source file {input:?}"))?;
        }
    }

    info!(
        "Batch complete: {} converted, {} routed to '{}'",
        converted.len(),
        routed,
        args.problem.display()
    );
    Ok(())
}

/// Profiles from an optional YAML file take priority over the builtins.
pub fn resolve_profiles(path: Option<&Path>) -> Result<Vec<aliases::Profile>> {
    let mut profiles = match path {
        Some(path) => aliases::load_profiles(path)?,
        None => Vec::new(),
    };
    profiles.extend(aliases::builtin_profiles());
    Ok(profiles)
}

fn list_files(source: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(source)
        .with_context(|| format!("Reading source directory {source:?}"))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Enumerating source directory {source:?}"))?;
    Ok(entries
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .sorted()
        .collect())
}

fn route_to_problem(input: &Path, problem_dir: &Path) -> Result<()> {
    let name = input
        .file_name()
        .with_context(|| format!("Input path {input:?} has no file name"))?;
    fs::copy(input, problem_dir.join(name))
        .with_context(|| format!("Copying {input:?} to problem directory"))?;
    Ok(())
}
