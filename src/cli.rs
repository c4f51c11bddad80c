use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::config::settings::MergePolicy;

#[derive(Parser, Debug)]
#[command(author, version, about = "Game arena leaderboard aggregator")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Aggregate score files into the leaderboard document
    Build(BuildArgs),
    /// Regenerate the runs manifest from the runs directory
    Manifest(ManifestArgs),
    /// Serve the leaderboard, rebuilding it on every request
    Serve {
        /// Port number (optional, defaults to 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,
    },
    /// Print shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct BuildArgs {
    /// Game configuration (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Name normalization rules (JSON)
    #[arg(long)]
    pub rules: Option<PathBuf>,
    /// Weight override file (`<game> - <weight>` lines)
    #[arg(long)]
    pub weights: Option<PathBuf>,
    /// Directory holding the per-game score files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Where the leaderboard document is published
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// How repeated rows of one model within a game are combined
    #[arg(long, value_enum)]
    pub merge: Option<MergeArg>,
}

#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct ManifestArgs {
    /// Game configuration (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory holding run result files
    #[arg(long)]
    pub runs_dir: Option<PathBuf>,
    /// Where the manifest is published
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeArg {
    Sum,
    Best,
}

impl From<MergeArg> for MergePolicy {
    fn from(arg: MergeArg) -> Self {
        match arg {
            MergeArg::Sum => MergePolicy::Sum,
            MergeArg::Best => MergePolicy::Best,
        }
    }
}
