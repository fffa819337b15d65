//! Submits control actions and routes their outcomes.

use std::sync::Arc;

use deck_core::api::Backend;
use deck_core::error::FetchError;
use deck_core::refresh::RefreshHandle;
use deck_core::types::ActionReceipt;
use tracing::{info, warn};

use crate::command::BotCommand;
use crate::notice::{Notice, NoticeFeed};

/// Write-side coordinator: the single entry point for bot control actions.
///
/// Every submit publishes exactly one notice. On success the controller then
/// fires the command's invalidation edges so the affected sources refetch;
/// on failure feed state stays untouched.
pub struct Controller {
    backend: Arc<dyn Backend>,
    refresh: RefreshHandle,
    notices: NoticeFeed,
}

impl Controller {
    pub fn new(backend: Arc<dyn Backend>, refresh: RefreshHandle, notices: NoticeFeed) -> Self {
        Self {
            backend,
            refresh,
            notices,
        }
    }

    /// Submit one action to the backend.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after publishing it as an error notice.
    /// Callers that only consume notices can ignore the returned value.
    pub async fn submit(&self, command: BotCommand) -> Result<ActionReceipt, FetchError> {
        info!("[ctl] submitting {command}");
        let outcome = match &command {
            BotCommand::Start { symbol } => self.backend.start_bot(symbol).await,
            BotCommand::Stop => self.backend.stop_bot().await,
        };

        match outcome {
            Ok(receipt) => {
                info!("[ctl] {} acknowledged: {}", command.label(), receipt.message);
                self.notices.publish(Notice::info(receipt.message.clone()));
                for source in command.invalidates() {
                    self.refresh.invalidate(*source);
                }
                Ok(receipt)
            }
            Err(e) => {
                warn!("[ctl] {} failed: {e}", command.label());
                self.notices.publish(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }
}
