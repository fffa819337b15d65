//! Wall-clock ticker for the time-of-day display.
//!
//! A single independent timer task that publishes the current local time once
//! per second. It shares no state with the feed; teardown aborts the task.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Periodic local-time publisher.
pub struct WallClock {
    now_rx: watch::Receiver<DateTime<Local>>,
    task: Option<JoinHandle<()>>,
}

impl WallClock {
    /// Start ticking once per second.
    pub fn start() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    /// Start with a custom tick period.
    pub fn with_period(period: Duration) -> Self {
        let (tx, now_rx) = watch::channel(Local::now());
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if tx.send(Local::now()).is_err() {
                    break; // every receiver is gone
                }
            }
        });
        Self {
            now_rx,
            task: Some(task),
        }
    }

    /// Latest published time.
    pub fn now(&self) -> DateTime<Local> {
        *self.now_rx.borrow()
    }

    /// Receiver for tick notifications.
    pub fn subscribe(&self) -> watch::Receiver<DateTime<Local>> {
        self.now_rx.clone()
    }

    /// Stop ticking.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for WallClock {
    fn drop(&mut self) {
        self.stop();
    }
}
