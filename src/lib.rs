pub mod aliases;
pub mod batch;
pub mod cli;
pub mod data;
pub mod dates;
pub mod error;
pub mod io_utils;
pub mod matching;
pub mod normalize;
pub mod pipeline;
pub mod rows;
pub mod schema;
pub mod table;
pub mod workbook;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use itertools::Itertools;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("ap_convert", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Batch(args) => batch::execute(&args),
        Commands::Convert(args) => handle_convert(&args),
        Commands::Aliases(args) => handle_aliases(&args),
    }
}

fn handle_convert(args: &cli::ConvertArgs) -> Result<()> {
    let options = pipeline::ConvertOptions {
        fill: args.fill.to_policy(),
        profiles: batch::resolve_profiles(args.profiles.as_deref())?,
        input_encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
    };
    let outcome = pipeline::convert_file(&args.input, &args.output_dir, &options, &[])?;
    for path in &outcome.outputs {
        println!("{}", path.display());
    }
    Ok(())
}

fn handle_aliases(args: &cli::AliasesArgs) -> Result<()> {
    let profiles = batch::resolve_profiles(args.profiles.as_deref())?;
    let table = match &args.profile {
        Some(name) => {
            let profile = profiles
                .iter()
                .find(|p| p.name == *name)
                .ok_or_else(|| anyhow::anyhow!("Unknown profile '{name}'"))?;
            aliases::AliasTable::builtin().with_profile(profile)
        }
        None => aliases::AliasTable::builtin(),
    };
    for (field, alias_list) in table.iter() {
        println!("{field}: {}", alias_list.iter().join(", "));
    }
    Ok(())
}
