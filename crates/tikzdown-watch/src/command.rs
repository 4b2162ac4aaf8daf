//! Generic watcher: run a command when matching files change.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::{info, warn};

use crate::error::WatchError;
use crate::handler::{ChangeHandler, matches_extension};

/// What a generic watcher reacts to and what it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// Working directory of the command.
    pub cwd: PathBuf,
    /// Path suffixes that trigger the command, e.g. `.tex`.
    pub extensions: Vec<String>,
    /// Command line, split on single spaces into program and arguments.
    pub command: String,
}

impl WatchConfig {
    pub fn new(cwd: impl Into<PathBuf>, extensions: Vec<String>, command: impl Into<String>) -> Self {
        Self {
            cwd: cwd.into(),
            extensions,
            command: command.into(),
        }
    }

    /// Split a comma-separated extension list such as `.tex,.sty`.
    pub fn parse_extensions(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|ext| !ext.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

/// Runs the configured command, in the foreground, for each matching change.
///
/// The command inherits standard streams. A non-zero exit is logged and the
/// session continues; a command that cannot be started ends it.
#[derive(Debug)]
pub struct CommandHandler {
    config: WatchConfig,
    program: String,
    args: Vec<String>,
}

impl CommandHandler {
    pub fn new(config: WatchConfig) -> Result<Self, WatchError> {
        let mut parts = config.command.split(' ').filter(|part| !part.is_empty());
        let program = parts.next().ok_or(WatchError::EmptyCommand)?.to_owned();
        let args = parts.map(str::to_owned).collect();

        Ok(Self {
            config,
            program,
            args,
        })
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Run the command once and wait for it.
    pub fn run_command(&self) -> Result<ExitStatus, WatchError> {
        info!(cmd = %self.config.command, cwd = %self.config.cwd.display(), "Running command");

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.config.cwd)
            .status()
            .map_err(|source| WatchError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            warn!(cmd = %self.config.command, %status, "Command failed");
        }
        Ok(status)
    }
}

impl ChangeHandler for CommandHandler {
    fn matches(&self, path: &Path) -> bool {
        matches_extension(path, &self.config.extensions)
    }

    fn on_change(&mut self, path: &Path) -> Result<(), WatchError> {
        info!(path = %path.display(), "Modification detected");
        self.run_command().map(|_| ())
    }
}
