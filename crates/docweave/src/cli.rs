//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docweave")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill a template with JSON data and write the document
    Generate(GenerateArgs),

    /// List the placeholder tokens of a template
    Inspect {
        /// Template document (`.docx.json` or `.xlsx.json`)
        #[arg(short, long)]
        template: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Template document (`.docx.json` or `.xlsx.json`)
    #[arg(short, long)]
    pub template: PathBuf,

    /// JSON file holding the placeholder data
    #[arg(short, long)]
    pub data: PathBuf,

    /// TOML file with format directives for the data fields
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Locale tag such as `de-DE`, overriding the config
    #[arg(long)]
    pub locale: Option<String>,

    /// docweave.toml configuration
    #[arg(short, long, env = "DOCWEAVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// How long to wait for the generation, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// URL prefix remote images may be fetched from (repeatable)
    #[arg(long = "trust")]
    pub trusted: Vec<String>,

    /// Directory for the generated document
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}
