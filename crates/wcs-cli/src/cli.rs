use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "wcs",
    about = "Working-copy status: groups a status dump the way the source-control view shows it",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the groups and the badge count for a status dump
    Status(StatusArgs),
    /// Print the path list a commit of the given paths would submit
    CommitPaths(CommitPathsArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Where the records and configuration come from.
#[derive(Args)]
pub struct SourceArgs {
    /// Working-copy root the record paths are relative to
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// JSON file holding an array of raw status records
    #[arg(long)]
    pub records: PathBuf,
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Upstream repository identity, for combining same-server externals
    #[arg(long)]
    pub upstream: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args)]
pub struct CommitPathsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Plan a commit of everything "commit all" would pick
    #[arg(long, conflicts_with = "paths")]
    pub all: bool,
    /// Paths to commit, absolute or relative to the root
    #[arg(required_unless_present = "all")]
    pub paths: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
