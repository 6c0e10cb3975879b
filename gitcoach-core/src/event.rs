use std::sync::mpsc;

use crate::git::StatusEntry;

/// Events that arrive asynchronously from background tasks.
/// These get merged into the main event loop alongside keyboard input.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// One line of output from a running command. stdout and stderr are
    /// aggregated into a single advisory log; their relative order across
    /// streams is not meaningful.
    CommandLine(String),

    /// A command failed (could not launch, exited non-zero, or timed out).
    /// Terminal for the active chain.
    CommandFailed(String),

    /// Every step of the active chain exited cleanly.
    ChainComplete,

    /// A `status --porcelain` listing was decoded in the background.
    StatusLoaded(Vec<StatusEntry>),

    /// Recent history was scanned for noisy commits.
    HistoryScanned(Vec<String>),
}

/// Handle for dispatching events from background threads into the loop.
///
/// Sends are infallible from the producer's point of view: once the screen
/// has exited its receiver is gone and late events are silently discarded.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: AppEvent) {
        let _ = self.tx.send(event);
    }
}
