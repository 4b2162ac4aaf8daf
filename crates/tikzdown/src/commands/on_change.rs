//! `tikzdown on-change` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use tikzdown_config::{CliSettings, Config};
use tikzdown_watch::{
    ChangeHandler, CommandHandler, WatchConfig, WatchError, run_until, shutdown_channel,
    watch_directory,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the on-change command.
#[derive(Args, Debug)]
pub(crate) struct OnChangeArgs {
    /// Path to configuration file (default: auto-discover tikzdown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory to watch recursively (default: current directory).
    dir: Option<PathBuf>,

    /// Working directory of the command (default: current directory).
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Comma-separated suffixes that trigger the command, e.g. `.tex,.sty`.
    #[arg(long)]
    ext: Option<String>,

    /// Command line to run on each change.
    #[arg(long)]
    cmd: Option<String>,
}

impl OnChangeArgs {
    /// Execute the on-change command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), Some(&self.settings()))?;
        let on_change = config.require_on_change()?;

        let handler = CommandHandler::new(WatchConfig::new(
            on_change.cwd.clone(),
            on_change.extensions.clone(),
            on_change.command.clone(),
        ))?;
        let mut announcer = Announcer {
            handler,
            output: &output,
        };

        let (events, _watcher) = watch_directory(&on_change.dir)?;
        output.info(&format!(
            "Monitoring {} for {}. Press ^C to exit.",
            on_change.dir.display(),
            on_change.extensions.join(", ")
        ));

        let (_handle, shutdown) = shutdown_channel();
        run_until(&mut announcer, &events, &shutdown)?;
        Ok(())
    }

    fn settings(&self) -> CliSettings {
        CliSettings {
            on_change_dir: self.dir.clone(),
            on_change_cwd: self.cwd.clone(),
            on_change_extensions: self.ext.as_deref().map(WatchConfig::parse_extensions),
            on_change_command: self.cmd.clone(),
            ..CliSettings::default()
        }
    }
}

/// Prints a banner before each command run.
struct Announcer<'a> {
    handler: CommandHandler,
    output: &'a Output,
}

impl ChangeHandler for Announcer<'_> {
    fn matches(&self, path: &Path) -> bool {
        self.handler.matches(path)
    }

    fn on_change(&mut self, path: &Path) -> Result<(), WatchError> {
        self.output
            .highlight(&format!("==> Modification detected: {}", path.display()));
        let status = self.handler.run_command()?;
        if !status.success() {
            self.output.error(&format!("Command exited with {status}"));
        }
        Ok(())
    }
}
