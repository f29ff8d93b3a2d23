//! Filesystem watching.
//!
//! A [`ChangeSubscription`] turns notify's callbacks into one stream of
//! change batches. The consumer runs the pipeline once per batch; changes
//! that arrive while a run is in progress queue up in the channel and are
//! coalesced into the next batch, so runs never overlap.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error};

use crate::discovery::is_source;
use crate::error::{RdftexError, Result};

/// Default quiet period that ends a burst of events.
pub const DEFAULT_QUIET: Duration = Duration::from_millis(150);

/// Source files touched by one burst of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    pub paths: BTreeSet<PathBuf>,
}

impl ChangeBatch {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }
}

/// Whether an event can change a run's outcome.
fn is_relevant(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) | EventKind::Any
    )
}

/// Collect the source paths an event touches into `batch`.
pub fn absorb(batch: &mut ChangeBatch, event: &Event) {
    if !is_relevant(&event.kind) {
        return;
    }

    batch
        .paths
        .extend(event.paths.iter().filter(|p| is_source(p)).cloned());
}

/// Receiving end of a change subscription.
pub struct ChangeStream {
    rx: Receiver<notify::Result<Event>>,
}

impl ChangeStream {
    /// Create a stream and the sender that feeds it.
    pub fn channel() -> (Sender<notify::Result<Event>>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// Block until source files change, then gather the whole burst.
    ///
    /// The burst ends once no event arrives for `quiet`. Returns `None`
    /// when the sending side is gone.
    pub fn next_batch(&self, quiet: Duration) -> Option<ChangeBatch> {
        let mut batch = ChangeBatch::default();

        while batch.is_empty() {
            self.receive(self.rx.recv().ok()?, &mut batch);
        }

        loop {
            match self.rx.recv_timeout(quiet) {
                Ok(result) => self.receive(result, &mut batch),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        debug!(files = batch.len(), "change batch ready");
        Some(batch)
    }

    fn receive(&self, result: notify::Result<Event>, batch: &mut ChangeBatch) {
        match result {
            Ok(event) => absorb(batch, &event),
            Err(e) => error!(error = %e, "file watcher error"),
        }
    }
}

/// A live recursive watch over a directory.
pub struct ChangeSubscription {
    _watcher: RecommendedWatcher,
    stream: ChangeStream,
}

impl ChangeSubscription {
    /// Start watching `dir` recursively.
    pub fn new(dir: &Path) -> Result<Self> {
        let (tx, stream) = ChangeStream::channel();

        let mut watcher = notify::recommended_watcher(move |result| {
            // the receiver is gone only when the subscription is dropped
            let _ = tx.send(result);
        })
        .map_err(|e| RdftexError::Watch {
            message: e.to_string(),
        })?;

        watcher
            .watch(dir, RecursiveMode::Recursive)
            .map_err(|e| RdftexError::Watch {
                message: format!("{}: {}", dir.display(), e),
            })?;

        debug!(dir = %dir.display(), "watching for changes");

        Ok(Self {
            _watcher: watcher,
            stream,
        })
    }

    /// See [`ChangeStream::next_batch`].
    pub fn next_batch(&self, quiet: Duration) -> Option<ChangeBatch> {
        self.stream.next_batch(quiet)
    }
}
