//! Error type for watch sessions.

use tikzdown_diagrams::ConvertError;

/// Failure that ends a watch session.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WatchError {
    /// The filesystem watcher could not be set up.
    #[error("file watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The configured command line is empty.
    #[error("command must not be empty")]
    EmptyCommand,

    /// The configured command could not be started.
    #[error("failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Converting a changed document failed.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}
