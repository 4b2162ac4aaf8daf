//! Change events and session shutdown.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

/// A file was modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Path of the modified file as reported by the source.
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Receiving end of a change event stream.
///
/// The stream ends when every sender is dropped.
pub struct EventReceiver {
    rx: mpsc::Receiver<ChangeEvent>,
}

impl EventReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<ChangeEvent>) -> Self {
        Self { rx }
    }

    pub(crate) fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<ChangeEvent, mpsc::RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Create an in-process event stream.
///
/// Used to feed a session from something other than the filesystem.
pub fn event_channel() -> (mpsc::Sender<ChangeEvent>, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (tx, EventReceiver::new(rx))
}

/// Handle to stop a watch session.
///
/// Dropping the handle stops the session too.
pub struct WatchHandle {
    _shutdown: Option<mpsc::Sender<()>>,
}

impl WatchHandle {
    /// Stop the session (consumes the handle).
    ///
    /// An event already being handled runs to completion first.
    pub fn stop(mut self) {
        self._shutdown.take();
    }
}

/// Observed by the session loop to learn that its [`WatchHandle`] is gone.
pub struct ShutdownSignal {
    rx: mpsc::Receiver<()>,
}

impl ShutdownSignal {
    pub fn is_stopped(&self) -> bool {
        !matches!(self.rx.try_recv(), Err(mpsc::TryRecvError::Empty))
    }
}

/// Create a linked stop handle and shutdown signal.
pub fn shutdown_channel() -> (WatchHandle, ShutdownSignal) {
    let (tx, rx) = mpsc::channel();
    (
        WatchHandle {
            _shutdown: Some(tx),
        },
        ShutdownSignal { rx },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_on_stop() {
        let (handle, signal) = shutdown_channel();
        assert!(!signal.is_stopped());

        handle.stop();

        assert!(signal.is_stopped());
    }

    #[test]
    fn test_shutdown_on_drop() {
        let (handle, signal) = shutdown_channel();

        drop(handle);

        assert!(signal.is_stopped());
    }

    #[test]
    fn test_event_channel_delivers_in_order() {
        let (tx, rx) = event_channel();
        tx.send(ChangeEvent::new("a.md")).unwrap();
        tx.send(ChangeEvent::new("b.md")).unwrap();
        drop(tx);

        let timeout = Duration::from_millis(10);
        assert_eq!(rx.recv_timeout(timeout), Ok(ChangeEvent::new("a.md")));
        assert_eq!(rx.recv_timeout(timeout), Ok(ChangeEvent::new("b.md")));
        assert_eq!(
            rx.recv_timeout(timeout),
            Err(mpsc::RecvTimeoutError::Disconnected)
        );
    }
}
