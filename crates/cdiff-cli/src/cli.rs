use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use cdiff_engine::DEFAULT_SAMPLE_SECTION;

#[derive(Parser)]
#[command(
    name = "cdiff",
    about = "Content Diff — compare CMS entries between two environments",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Config file (defaults to ./cdiff.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare a current snapshot with a remote one
    Compare(CompareArgs),
    /// Print a built-in sample report
    Sample(SampleArgs),
}

#[derive(Args)]
pub struct CompareArgs {
    /// Snapshot of this environment (JSON)
    pub current: PathBuf,
    /// Snapshot or diff endpoint response of the other environment (JSON)
    pub remote: PathBuf,
    /// Nested block levels to expand
    #[arg(long)]
    pub depth: Option<usize>,
    /// JSON object mapping asset IDs to filenames
    #[arg(long)]
    pub asset_labels: Option<PathBuf>,
    /// Name of the remote environment, used in messages
    #[arg(long)]
    pub remote_label: Option<String>,
    /// Exit with status 1 when differences are found
    #[arg(long)]
    pub exit_code: bool,
}

#[derive(Args)]
pub struct SampleArgs {
    #[arg(long, default_value = DEFAULT_SAMPLE_SECTION)]
    pub section: String,
}
