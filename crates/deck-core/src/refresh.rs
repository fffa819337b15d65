//! The refresh channel: how anything outside the feed layer asks for a
//! source to be refetched.
//!
//! Control actions declare which sources they invalidate; submitting a
//! successful action pushes those [`SourceId`]s through this channel and the
//! aggregator refetches them. The channel is the only coupling between the
//! control side and the feed side.

use tokio::sync::mpsc;
use tracing::debug;

use crate::types::SourceId;

/// Receiver half of the refresh channel.
///
/// Owned by the aggregator's coordination task.
pub type RefreshReceiver = mpsc::UnboundedReceiver<SourceId>;

/// Cloneable handle for requesting refetches.
#[derive(Debug, Clone)]
pub struct RefreshHandle {
    tx: mpsc::UnboundedSender<SourceId>,
}

impl RefreshHandle {
    /// Ask the aggregator to refetch one source.
    ///
    /// Fire-and-forget: if the aggregator has already shut down, the request
    /// is dropped.
    pub fn invalidate(&self, source: SourceId) {
        if self.tx.send(source).is_err() {
            debug!("[refresh] dropped invalidation for {source}, feed is gone");
        }
    }
}

/// Create a connected handle/receiver pair.
pub fn refresh_channel() -> (RefreshHandle, RefreshReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (RefreshHandle { tx }, rx)
}
