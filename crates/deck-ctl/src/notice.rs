//! Operator notices: the outcome channel for control actions.
//!
//! Every submitted action produces exactly one notice, success or failure.
//! The presentation layer drains the feed at its own pace instead of being
//! interrupted per action.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One operator-visible message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// How many unread notices a subscriber can fall behind by.
const FEED_CAPACITY: usize = 32;

/// Broadcast feed of notices. Clones share the feed.
///
/// Subscribers that fall more than [`FEED_CAPACITY`] notices behind miss the
/// oldest ones.
#[derive(Debug, Clone)]
pub struct NoticeFeed {
    tx: broadcast::Sender<Notice>,
}

impl NoticeFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    /// Publish one notice. Dropped silently when nobody subscribes.
    pub fn publish(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }

    /// Subscribe to notices published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }
}

impl Default for NoticeFeed {
    fn default() -> Self {
        Self::new()
    }
}
