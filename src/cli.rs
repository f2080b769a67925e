use std::path::PathBuf;

use clap::Parser;

/// Collect directory listings into a single `tree.txt` report.
#[derive(Parser, Debug)]
#[command(
    name = "tree-report",
    version,
    about = "Write `tree` listings for several directories into tree.txt"
)]
pub struct Cli {
    /// Directories to list, in report order. Overrides the configured list.
    #[arg(value_name = "DIRECTORIES")]
    pub directories: Vec<String>,
    /// Change to this directory before resolving paths and writing the report.
    #[arg(short = 'C', long = "chdir")]
    pub chdir: Option<PathBuf>,
    /// Explicit configuration file.
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse() -> Cli {
    Cli::parse()
}
