//! `tikzdown watch` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use tikzdown_config::{CliSettings, Config};
use tikzdown_diagrams::document_renderer;
use tikzdown_watch::{
    ChangeHandler, MarkupHandler, WatchError, run_until, shutdown_channel, watch_directory,
};

use super::{CompilerArgs, build_processor};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the watch command.
#[derive(Args, Debug)]
pub(crate) struct WatchArgs {
    /// Directory to watch recursively (overrides config).
    dir: Option<PathBuf>,

    #[command(flatten)]
    compiler: CompilerArgs,
}

impl WatchArgs {
    /// Execute the watch command.
    ///
    /// Runs until interrupted. Diagrams are cached for the whole session.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.compiler.config.as_deref(), Some(&self.settings()))?;

        let handler = MarkupHandler::new(document_renderer(build_processor(&config)))
            .with_extensions(config.watch.extensions.clone())
            .with_output_extension(config.watch.output_extension.clone());
        let mut reporter = Reporter {
            handler,
            output: &output,
        };

        let (events, _watcher) = watch_directory(&config.watch.dir)?;
        output.info(&format!(
            "Monitoring {} for {}. Press ^C to exit.",
            config.watch.dir.display(),
            config.watch.extensions.join(", ")
        ));

        let (_handle, shutdown) = shutdown_channel();
        run_until(&mut reporter, &events, &shutdown)?;
        Ok(())
    }

    fn settings(&self) -> CliSettings {
        CliSettings {
            watch_dir: self.dir.clone(),
            ..self.compiler.settings()
        }
    }
}

/// Prints each conversion to the terminal.
///
/// A document that cannot be converted is reported and the session goes on.
struct Reporter<'a> {
    handler: MarkupHandler,
    output: &'a Output,
}

impl ChangeHandler for Reporter<'_> {
    fn matches(&self, path: &Path) -> bool {
        self.handler.matches(path)
    }

    fn on_change(&mut self, path: &Path) -> Result<(), WatchError> {
        match self.handler.convert(path) {
            Ok(conversion) => {
                self.output.converted(&conversion.input, &conversion.output);
                self.output.warnings(&conversion.warnings);
            }
            Err(WatchError::Convert(err)) => self.output.error(&format!("Error: {err}")),
            Err(err) => return Err(err),
        }
        Ok(())
    }
}
