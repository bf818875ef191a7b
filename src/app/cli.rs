use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Format and clean an Unreal Engine workspace"
)]
pub struct Cli {
    /// Read settings from this TOML file instead of ue-tidy.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        match &self.command {
            Commands::FormatAll(args) | Commands::FormatChanged(args) => args.verbose,
            Commands::Clean(args) => args.verbose,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Format every tracked source file and manifest
    FormatAll(FormatArgs),
    /// Format only files that differ from the reference revision
    FormatChanged(FormatArgs),
    /// Delete generated build directories and files
    Clean(CleanArgs),
}

#[derive(Args, Debug, Default)]
pub struct FormatArgs {
    /// Print the files that were formatted
    #[arg(long, short)]
    pub verbose: bool,

    /// Report formatter failures and carry on instead of stopping
    #[arg(long)]
    pub keep_going: bool,

    /// Sub-project directory, relative to the repository top-level, to scope formatting to
    #[arg(long)]
    pub root: Option<String>,

    /// Revision to list or compare against (default: HEAD)
    #[arg(long)]
    pub reference: Option<String>,

    /// Additional project root to format (repeatable)
    #[arg(long = "project")]
    pub projects: Option<Vec<String>>,

    /// Additional plugin whose Source/ is formatted (repeatable)
    #[arg(long = "plugin")]
    pub plugins: Option<Vec<String>>,

    /// Formatter binary (default: clang-format)
    #[arg(long)]
    pub formatter: Option<String>,

    /// Restrict formatting to these paths
    pub paths: Vec<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct CleanArgs {
    /// Print debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Additional entry or glob pattern to delete (repeatable)
    #[arg(long = "target")]
    pub targets: Option<Vec<String>>,

    /// Directory to clean (default: current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}
