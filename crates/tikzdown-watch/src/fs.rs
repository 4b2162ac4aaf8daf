//! Filesystem event source backed by `notify`.

use std::path::Path;
use std::sync::mpsc;

use notify::event::ModifyKind;
use notify::{EventKind, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::error::WatchError;
use crate::event::{ChangeEvent, EventReceiver};

/// Keeps the underlying OS watcher alive. Dropping it ends the event stream.
pub struct FsWatcher {
    _watcher: notify::RecommendedWatcher,
}

/// Watch `dir` recursively for file modifications.
///
/// Subdirectories created later are watched as well. Only content
/// modifications are delivered; creations, removals, renames and metadata
/// changes are ignored.
pub fn watch_directory(dir: &Path) -> Result<(EventReceiver, FsWatcher), WatchError> {
    let (tx, rx) = mpsc::channel();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        forward_modifications(res, &tx);
    })?;
    watcher.watch(dir, RecursiveMode::Recursive)?;
    debug!(dir = %dir.display(), "Watching directory");

    Ok((EventReceiver::new(rx), FsWatcher { _watcher: watcher }))
}

fn forward_modifications(res: notify::Result<notify::Event>, tx: &mpsc::Sender<ChangeEvent>) {
    let event = match res {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "File watcher error");
            return;
        }
    };
    if !matches!(
        event.kind,
        EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Any)
    ) {
        return;
    }
    for path in event.paths {
        // The receiver is gone once the session has ended.
        if tx.send(ChangeEvent { path }).is_err() {
            return;
        }
    }
}
