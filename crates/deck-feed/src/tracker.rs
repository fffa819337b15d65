//! Per-source fetch lifecycle tracking.
//!
//! A [`SourceTracker`] is one state cell plus the machinery that keeps it
//! honest under overlapping fetches: every dispatch gets a generation number,
//! the previous in-flight task is aborted, and a settlement is applied only
//! if its generation is still the newest. Readers observe the cell through
//! `tokio::sync::watch` receivers and never see an intermediate state.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use deck_core::error::FetchError;
use deck_core::types::{SourceId, SourceState};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Tracks one data source through `Loading` / `Error` / `Ready`.
///
/// Single-writer: exactly one owner calls [`trigger`](Self::trigger), while
/// any number of receivers watch the cell. The cell starts in `Loading`.
pub struct SourceTracker<T> {
    id: SourceId,
    state_tx: Arc<watch::Sender<SourceState<T>>>,
    generation: Arc<AtomicU64>,
    inflight: Option<JoinHandle<()>>,
}

impl<T: Send + Sync + 'static> SourceTracker<T> {
    pub fn new(id: SourceId) -> Self {
        let (state_tx, _) = watch::channel(SourceState::Loading);
        Self {
            id,
            state_tx: Arc::new(state_tx),
            generation: Arc::new(AtomicU64::new(0)),
            inflight: None,
        }
    }

    /// A new receiver observing this cell.
    pub fn subscribe(&self) -> watch::Receiver<SourceState<T>> {
        self.state_tx.subscribe()
    }

    /// Launch a fetch, superseding whatever was in flight.
    ///
    /// The cell flips to `Loading` immediately. When `fetch` settles, the
    /// result lands in the cell unless a newer `trigger` has happened in the
    /// meantime; a superseded settlement is discarded without touching the
    /// cell. The superseded task is also aborted, so a hung request cannot
    /// pile up behind a fast retry.
    pub fn trigger<F>(&mut self, fetch: F)
    where
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(superseded) = self.inflight.take() {
            superseded.abort();
        }
        self.state_tx.send_replace(SourceState::Loading);
        debug!("[{}] dispatch (generation {generation})", self.id);

        let id = self.id;
        let state_tx = Arc::clone(&self.state_tx);
        let current = Arc::clone(&self.generation);
        self.inflight = Some(tokio::spawn(async move {
            let outcome = fetch.await;
            apply_settlement(id, &state_tx, &current, generation, outcome);
        }));
    }
}

// A dropped tracker takes its in-flight fetch down with it.
impl<T> Drop for SourceTracker<T> {
    fn drop(&mut self) {
        if let Some(task) = self.inflight.take() {
            task.abort();
        }
    }
}

/// Apply a settled fetch to the cell, unless a newer dispatch has superseded
/// it. Returns `true` if the settlement was applied.
///
/// The generation check runs inside the watch lock, so it cannot interleave
/// with a concurrent `trigger` flipping the cell back to `Loading`.
fn apply_settlement<T>(
    id: SourceId,
    state_tx: &watch::Sender<SourceState<T>>,
    current: &AtomicU64,
    generation: u64,
    outcome: Result<T, FetchError>,
) -> bool {
    if let Err(e) = &outcome {
        warn!("[{id}] fetch failed: {e}");
    }
    let next = match outcome {
        Ok(data) => SourceState::Ready(data),
        Err(e) => SourceState::Error(e.to_string()),
    };
    let applied = state_tx.send_if_modified(|state| {
        if current.load(Ordering::Acquire) != generation {
            return false;
        }
        *state = next;
        true
    });
    if !applied {
        debug!("[{id}] discarded settlement from superseded dispatch (generation {generation})");
    }
    applied
}
