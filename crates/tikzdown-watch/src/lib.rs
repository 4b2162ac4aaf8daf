//! Change-triggered recompilation.
//!
//! A watch session couples an event source with a [`ChangeHandler`]:
//! - [`watch_directory`] delivers modification events for a directory tree
//! - [`CommandHandler`] runs a fixed command when a matching file changes
//! - [`MarkupHandler`] converts a changed markdown file to HTML next to it
//! - [`run_until`] dispatches events until stopped through a [`WatchHandle`]
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tikzdown_watch::{CommandHandler, WatchConfig, run_until, shutdown_channel, watch_directory};
//!
//! let config = WatchConfig::new(".", WatchConfig::parse_extensions(".tex,.sty"), "make pdf");
//! let mut handler = CommandHandler::new(config)?;
//! let (events, _watcher) = watch_directory(Path::new("."))?;
//! let (_handle, shutdown) = shutdown_channel();
//!
//! run_until(&mut handler, &events, &shutdown)?;
//! # Ok::<(), tikzdown_watch::WatchError>(())
//! ```

mod command;
mod error;
mod event;
mod fs;
mod handler;
mod markup;

pub use command::{CommandHandler, WatchConfig};
pub use error::WatchError;
pub use event::{ChangeEvent, EventReceiver, ShutdownSignal, WatchHandle, event_channel, shutdown_channel};
pub use fs::{FsWatcher, watch_directory};
pub use handler::{ChangeHandler, matches_extension, run_until};
pub use markup::{Conversion, MARKUP_EXTENSIONS, MarkupHandler, OUTPUT_EXTENSION};
