use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Merge and compare spatially overlapping document attributes.
#[derive(Debug, Parser)]
#[command(name = "attrmerge", about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge overlapping attributes of a document and print the result
    Merge {
        /// Path to the document JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        options: OptionArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write the result to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Check whether two attribute sets describe the same fields
    Compare {
        /// First document JSON file
        #[arg(value_name = "FILE_A")]
        file_a: PathBuf,

        /// Second document JSON file
        #[arg(value_name = "FILE_B")]
        file_b: PathBuf,

        #[command(flatten)]
        options: OptionArgs,
    },
}

/// Merge option sources shared by all subcommands.
#[derive(Debug, Args)]
pub struct OptionArgs {
    /// Merge options JSON file. Default: built-in defaults
    #[arg(long, value_name = "OPTIONS")]
    pub options: Option<PathBuf>,

    /// Override the overlap threshold percentage (0-100)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Require mutual overlap
    #[arg(long)]
    pub mutual: bool,

    /// Replace merged zones with one bounding region
    #[arg(long)]
    pub merged_region: bool,

    /// Keep merged attributes as sub-attributes of their result
    #[arg(long)]
    pub sub_attributes: bool,
}

/// Output format for merged attributes.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
