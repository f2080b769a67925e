use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::config::{self, PROJECT_CONFIG_FILE, REPORT_FILE, ReportConfig};
use crate::report;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ConfigPathSource {
    Explicit,
    Discovered,
    HomeDefault,
}

impl ConfigPathSource {
    fn as_str(&self) -> &'static str {
        match self {
            ConfigPathSource::Explicit => "explicit",
            ConfigPathSource::Discovered => "discovered",
            ConfigPathSource::HomeDefault => "home-default",
        }
    }
}

#[derive(Clone, Debug)]
struct ResolvedConfigPath {
    path: Utf8PathBuf,
    source: ConfigPathSource,
}

fn describe_origin(origin: Option<&ResolvedConfigPath>) -> String {
    match origin {
        Some(resolved) => format!("{} ({})", resolved.path, resolved.source.as_str()),
        None => "built-in defaults".to_owned(),
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);
    ctx.apply_chdir()?;

    let (config, origin) = ctx.load_config()?;
    let origin = describe_origin(origin.as_ref());
    debug!(config = %origin, "configuration resolved");

    let directories = if cli.directories.is_empty() {
        config.directories()
    } else {
        cli.directories
    };
    let lister = config.listing_command()?;

    if ctx.dry_run {
        for line in config::format_summary(&directories, &lister, &origin).lines() {
            info!("(dry-run) {}", line);
        }
        return Ok(());
    }

    let summary = report::write_report(Utf8Path::new(REPORT_FILE), &directories, &lister)?;
    if summary.failed > 0 {
        warn!(
            "{} of {} listings failed; see {} for details",
            summary.failed, summary.sections, REPORT_FILE
        );
    }
    info!("Wrote {} section(s) to {}", summary.sections, REPORT_FILE);
    Ok(())
}

struct CliContext {
    chdir: Option<PathBuf>,
    file: Option<PathBuf>,
    dry_run: bool,
}

impl CliContext {
    fn apply_chdir(&self) -> Result<()> {
        if let Some(path) = &self.chdir {
            std::env::set_current_dir(path)
                .with_context(|| format!("changing directory to {}", path.display()))?;
        }
        Ok(())
    }

    fn load_config(&self) -> Result<(ReportConfig, Option<ResolvedConfigPath>)> {
        match self.resolve_config_path()? {
            Some(resolved) => {
                let config = config::load_from_path(&resolved.path)?;
                Ok((config, Some(resolved)))
            }
            None => Ok((ReportConfig::default(), None)),
        }
    }

    /// Explicit `--file`, then the nearest `.tree-report.toml`, then `~/.tree-report/config.toml`.
    fn resolve_config_path(&self) -> Result<Option<ResolvedConfigPath>> {
        if let Some(path) = &self.file {
            let path = Utf8PathBuf::from_path_buf(path.clone())
                .map_err(|_| anyhow!("config path must be valid UTF-8"))?;
            return Ok(Some(ResolvedConfigPath {
                path,
                source: ConfigPathSource::Explicit,
            }));
        }

        if let Ok(cwd) = std::env::current_dir() {
            if let Ok(mut dir) = Utf8PathBuf::from_path_buf(cwd) {
                loop {
                    let candidate = dir.join(PROJECT_CONFIG_FILE);
                    if candidate.is_file() {
                        return Ok(Some(ResolvedConfigPath {
                            path: candidate,
                            source: ConfigPathSource::Discovered,
                        }));
                    }

                    let Some(parent) = dir.parent() else {
                        break;
                    };
                    dir = parent.to_path_buf();
                }
            }
        }

        home_config_path(dirs::home_dir())
    }
}

fn home_config_path(home: Option<PathBuf>) -> Result<Option<ResolvedConfigPath>> {
    let Some(mut path) = home else {
        return Ok(None);
    };
    path.push(".tree-report");
    path.push("config.toml");
    if !path.is_file() {
        return Ok(None);
    }
    let path =
        Utf8PathBuf::from_path_buf(path).map_err(|_| anyhow!("config path must be valid UTF-8"))?;
    Ok(Some(ResolvedConfigPath {
        path,
        source: ConfigPathSource::HomeDefault,
    }))
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            chdir: cli.chdir.clone(),
            file: cli.file.clone(),
            dry_run: cli.dry_run,
        }
    }
}
