use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use serde::Deserialize;

use crate::lister::ListingCommand;
use crate::util::format_command;

/// Directories listed when neither the CLI nor a config file names any.
pub const DEFAULT_DIRECTORIES: [&str; 3] = ["include", "src", "run"];

/// Listing program used when the config does not set `command`.
pub const DEFAULT_COMMAND: &str = "tree";

/// Report file, relative to the working directory.
pub const REPORT_FILE: &str = "tree.txt";

/// Name of the per-project config file discovered by walking up from the cwd.
pub const PROJECT_CONFIG_FILE: &str = ".tree-report.toml";

/// Optional configuration document, e.g. `.tree-report.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub directories: Option<Vec<String>>,
    pub command: Option<Vec<String>>,
}

impl ReportConfig {
    pub fn directories(&self) -> Vec<String> {
        match &self.directories {
            Some(dirs) => dirs.clone(),
            None => DEFAULT_DIRECTORIES.iter().map(|d| (*d).to_owned()).collect(),
        }
    }

    pub fn listing_command(&self) -> Result<ListingCommand> {
        match &self.command {
            None => Ok(ListingCommand::new(DEFAULT_COMMAND)),
            Some(argv) => {
                let Some((program, args)) = argv.split_first() else {
                    bail!("`command` must name a program; got an empty array");
                };
                if program.trim().is_empty() {
                    bail!("`command` program must not be blank");
                }
                Ok(ListingCommand::new(program.clone()).with_args(args.to_vec()))
            }
        }
    }
}

/// Load a configuration file from disk and deserialize it.
pub fn load_from_path(path: &Utf8Path) -> Result<ReportConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}

/// `config_source` is a one-line description of where the settings came from.
pub fn format_summary(
    directories: &[String],
    command: &ListingCommand,
    config_source: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Config: {}", config_source);
    let _ = writeln!(out, "Report file: {}", REPORT_FILE);
    let _ = writeln!(out, "Listing command: {}", format_command(&command.argv()));
    if directories.is_empty() {
        let _ = writeln!(out, "Directories: <none>");
    } else {
        let _ = writeln!(out, "Directories ({}):", directories.len());
        for dir in directories {
            let _ = writeln!(out, "  - {}", dir);
        }
    }
    out
}
