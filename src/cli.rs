use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::schema::FillPolicy;

#[derive(Debug, Parser)]
#[command(author, version, about = "Normalize variant AP exports into a canonical schema", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert every file in a source directory, routing failures aside
    Batch(BatchArgs),
    /// Convert a single file
    Convert(ConvertArgs),
    /// Print the effective alias table, optionally under a profile
    Aliases(AliasesArgs),
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Directory of input files to convert
    #[arg(short = 's', long = "source")]
    pub source: PathBuf,
    /// Directory for converted output files
    #[arg(short = 't', long = "target")]
    pub target: PathBuf,
    /// Directory for files that failed conversion
    #[arg(short = 'p', long = "problem")]
    pub problem: PathBuf,
    /// YAML file with additional source profiles
    #[arg(long = "profiles")]
    pub profiles: Option<PathBuf>,
    /// Fill value for canonical columns missing from the input
    #[arg(long = "fill", value_enum, default_value = "empty")]
    pub fill: FillArg,
    /// Character encoding of input text files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Leave source files in place after a successful batch
    #[arg(long = "keep-sources")]
    pub keep_sources: bool,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Input file to convert
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Directory for the converted output (defaults to the current directory)
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
    /// YAML file with additional source profiles
    #[arg(long = "profiles")]
    pub profiles: Option<PathBuf>,
    /// Fill value for canonical columns missing from the input
    #[arg(long = "fill", value_enum, default_value = "empty")]
    pub fill: FillArg,
    /// Character encoding of input text files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct AliasesArgs {
    /// YAML file with additional source profiles
    #[arg(long = "profiles")]
    pub profiles: Option<PathBuf>,
    /// Show the table as seen under this profile
    #[arg(long = "profile")]
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum FillArg {
    /// Empty string
    #[default]
    Empty,
    /// The literal NULL marker
    Null,
}

impl FillArg {
    pub fn to_policy(self) -> FillPolicy {
        match self {
            FillArg::Empty => FillPolicy::Empty,
            FillArg::Null => FillPolicy::NullMarker,
        }
    }
}
