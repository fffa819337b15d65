//! # Backend API surface
//!
//! Everything the dashboard asks of its backend, behind one async trait.
//! The feed and control layers only ever see [`Backend`], so tests swap in
//! scripted implementations and the runner plugs in [`HttpBackend`].
//!
//! | Operation   | Method | Path                                        |
//! |-------------|--------|---------------------------------------------|
//! | Bot status  | GET    | `/api/v1/bot-status`                        |
//! | Start bot   | POST   | `/api/v1/bot/start?symbol={symbol}`         |
//! | Stop bot    | POST   | `/api/v1/bot/stop`                          |
//! | Account     | GET    | `/api/v1/alpaca/account`                    |
//! | Positions   | GET    | `/api/v1/alpaca/positions`                  |
//! | Orders      | GET    | `/api/v1/alpaca/orders?status=..&limit=..`  |
//! | History     | GET    | `/api/v1/fmp/historical-price/{symbol}`     |

pub mod endpoints;
pub mod http;

pub use endpoints::{HistoryQuery, OrdersQuery};
pub use http::HttpBackend;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::{Account, ActionReceipt, BotStatus, Order, Position, PricePoint};

/// Uniform interface to the dashboard backend.
///
/// One method per data source plus the two bot actions. All methods take
/// `&self` so one shared instance can serve concurrent fetches.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Current bot run state.
    async fn bot_status(&self) -> Result<BotStatus, FetchError>;

    /// Brokerage account summary.
    async fn account(&self) -> Result<Account, FetchError>;

    /// Open positions.
    async fn positions(&self) -> Result<Vec<Position>, FetchError>;

    /// Recent orders matching `query`.
    async fn orders(&self, query: &OrdersQuery) -> Result<Vec<Order>, FetchError>;

    /// Daily price history for one symbol, newest first, untruncated.
    async fn history(&self, query: &HistoryQuery) -> Result<Vec<PricePoint>, FetchError>;

    /// Start the bot on `symbol`.
    async fn start_bot(&self, symbol: &str) -> Result<ActionReceipt, FetchError>;

    /// Stop the bot.
    async fn stop_bot(&self) -> Result<ActionReceipt, FetchError>;
}
