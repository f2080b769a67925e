use std::process::{Command, Output};

use tracing::{debug, warn};

use crate::util::format_command;

/// Outcome of listing one directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Listing {
    /// Standard output of a successful run, byte for byte.
    Tree(Vec<u8>),
    /// Formatted error line naming the directory.
    Failed(String),
}

impl Listing {
    pub fn body(&self) -> &[u8] {
        match self {
            Listing::Tree(bytes) => bytes,
            Listing::Failed(line) => line.as_bytes(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Listing::Failed(_))
    }
}

/// External listing program; the directory is appended as its final argument.
#[derive(Clone, Debug)]
pub struct ListingCommand {
    program: String,
    args: Vec<String>,
}

impl ListingCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// The argv without the directory argument.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Run the listing for `directory`. Failures come back as `Listing::Failed`.
    pub fn run(&self, directory: &str) -> Listing {
        let mut argv = self.argv();
        argv.push(directory.to_owned());
        let render = format_command(&argv);
        debug!(command = %render, "listing directory");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(directory)
            .output();

        match output {
            Ok(output) if output.status.success() => Listing::Tree(output.stdout),
            Ok(output) => {
                let details = describe_exit(&render, &output);
                warn!(directory, "{}", details);
                Listing::Failed(failure_line(directory, &details))
            }
            Err(err) => {
                let details = format!("failed to run `{}`: {}", render, err);
                warn!(directory, "{}", details);
                Listing::Failed(failure_line(directory, &details))
            }
        }
    }
}

fn failure_line(directory: &str, details: &str) -> String {
    format!("An error occurred while processing {}: {}", directory, details)
}

fn describe_exit(render: &str, output: &Output) -> String {
    let status = match output.status.code() {
        Some(code) => format!("`{}` exited with status {}", render, code),
        None => format!("`{}` was terminated by a signal", render),
    };
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status
    } else {
        format!("{}: {}", status, stderr)
    }
}
