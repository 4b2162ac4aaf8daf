//! CLI command implementations.

pub(crate) mod convert;
pub(crate) mod on_change;
pub(crate) mod watch;

pub(crate) use convert::ConvertArgs;
pub(crate) use on_change::OnChangeArgs;
pub(crate) use watch::WatchArgs;

use std::path::PathBuf;

use clap::Args;
use tikzdown_config::{CliSettings, Config};
use tikzdown_diagrams::{JobTemplate, TexCompiler, TikzProcessor};
use tracing::debug;

/// Diagram compiler options shared by converting commands.
#[derive(Args, Debug, Default)]
pub(crate) struct CompilerArgs {
    /// Path to configuration file (default: auto-discover tikzdown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compiler command line, run in the job directory (overrides config).
    #[arg(long, env = "TIKZDOWN_COMMAND")]
    tikz_command: Option<String>,

    /// Kill the compiler after this many seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,
}

impl CompilerArgs {
    /// CLI settings carrying the compiler overrides.
    fn settings(&self) -> CliSettings {
        CliSettings {
            tikz_command: self.tikz_command.clone(),
            timeout_secs: self.timeout,
            ..CliSettings::default()
        }
    }
}

/// Build the diagram processor described by `config`.
pub(crate) fn build_processor(config: &Config) -> TikzProcessor {
    let tikz = &config.tikz;
    debug!(
        config = ?config.config_path,
        command = ?tikz.command,
        "Using diagram compiler"
    );

    let compiler = tikz
        .command
        .as_deref()
        .map_or_else(TexCompiler::default, TexCompiler::new)
        .with_timeout(tikz.timeout());

    let mut template = JobTemplate::default();
    if let Some(driver) = &tikz.driver {
        template = template.with_driver(driver.clone());
    }
    if let Some(packages) = &tikz.packages {
        template = template.with_packages(packages.iter().cloned());
    }

    TikzProcessor::new(compiler).with_template(template)
}
