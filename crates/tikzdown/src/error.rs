//! CLI error types.

use tikzdown_config::ConfigError;
use tikzdown_diagrams::ConvertError;
use tikzdown_watch::WatchError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("{0}")]
    Watch(#[from] WatchError),
}
