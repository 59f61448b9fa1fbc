use std::path::PathBuf;

use am_merge::ConflictPolicy;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "assetmerge",
    about = "Three-way line merge driver for structured asset files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with merge settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PolicyArg {
    Markers,
    Ours,
    Theirs,
    Abort,
}

impl From<PolicyArg> for ConflictPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Markers => ConflictPolicy::Markers,
            PolicyArg::Ours => ConflictPolicy::Ours,
            PolicyArg::Theirs => ConflictPolicy::Theirs,
            PolicyArg::Abort => ConflictPolicy::Abort,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge ours, base and theirs; overwrites ours (git merge driver)
    Merge(MergeArgs),
    /// Show the classified blocks between two files
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    pub ours: PathBuf,
    pub base: PathBuf,
    pub theirs: PathBuf,
    #[arg(long)]
    pub policy: Option<PolicyArg>,
    #[arg(long)]
    pub marker_size: Option<usize>,
    #[arg(long)]
    pub ours_label: Option<String>,
    #[arg(long)]
    pub theirs_label: Option<String>,
    #[arg(long)]
    pub no_skip_delimiters: bool,
    /// Print the result instead of overwriting ours
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub base: PathBuf,
    pub modified: PathBuf,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
    #[arg(long)]
    pub no_skip_delimiters: bool,
}
