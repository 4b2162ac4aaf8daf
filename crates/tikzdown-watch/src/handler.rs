//! Session loop dispatching change events to a handler.

use std::path::Path;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use tracing::debug;

use crate::error::WatchError;
use crate::event::{EventReceiver, ShutdownSignal};

/// How long the loop waits for an event before rechecking for shutdown.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Reacts to modified files.
pub trait ChangeHandler {
    /// Whether a change to `path` concerns this handler.
    fn matches(&self, path: &Path) -> bool;

    /// Handle a change to a matching `path`.
    ///
    /// Runs synchronously; later events queue up meanwhile. An error ends the
    /// session.
    fn on_change(&mut self, path: &Path) -> Result<(), WatchError>;
}

/// Whether the path ends with any of `extensions`.
///
/// Plain suffix comparison, so `.tar.gz` works and `.md` does not match
/// `README.MD`.
pub fn matches_extension<S: AsRef<str>>(path: &Path, extensions: &[S]) -> bool {
    let path = path.to_string_lossy();
    extensions
        .iter()
        .any(|ext| path.ends_with(ext.as_ref()))
}

/// Dispatch events to `handler` until stopped.
///
/// Returns `Ok(())` once `shutdown` fires or every event sender is gone, and
/// the handler's error if it fails. Events for non-matching paths are dropped.
pub fn run_until<H: ChangeHandler + ?Sized>(
    handler: &mut H,
    events: &EventReceiver,
    shutdown: &ShutdownSignal,
) -> Result<(), WatchError> {
    loop {
        if shutdown.is_stopped() {
            debug!("Watch session stopped");
            return Ok(());
        }

        match events.recv_timeout(POLL_INTERVAL) {
            Ok(event) => {
                if handler.matches(&event.path) {
                    handler.on_change(&event.path)?;
                } else {
                    debug!(path = %event.path.display(), "Ignoring change");
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Event source closed");
                return Ok(());
            }
        }
    }
}
