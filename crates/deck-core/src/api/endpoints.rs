//! Request paths and query parameters for the backend endpoints.
//!
//! Pure string builders, kept apart from the HTTP client so the exact wire
//! paths are unit-testable.

use std::fmt::Write;

use chrono::NaiveDate;
use urlencoding::encode;

/// Bot run state.
pub const BOT_STATUS: &str = "/api/v1/bot-status";

/// Stop the bot.
pub const BOT_STOP: &str = "/api/v1/bot/stop";

/// Brokerage account summary.
pub const ACCOUNT: &str = "/api/v1/alpaca/account";

/// Open positions.
pub const POSITIONS: &str = "/api/v1/alpaca/positions";

/// Start the bot on one symbol.
pub fn bot_start(symbol: &str) -> String {
    format!("/api/v1/bot/start?symbol={}", encode(symbol))
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// Filters for the orders endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersQuery {
    /// Order status filter, e.g. `"filled"`.
    pub status: String,
    /// Maximum number of orders returned.
    pub limit: u32,
}

/// The dashboard shows the ten most recent fills.
impl Default for OrdersQuery {
    fn default() -> Self {
        Self {
            status: "filled".to_string(),
            limit: 10,
        }
    }
}

/// Recent orders.
pub fn orders(query: &OrdersQuery) -> String {
    format!(
        "/api/v1/alpaca/orders?status={}&limit={}",
        encode(&query.status),
        query.limit
    )
}

// ---------------------------------------------------------------------------
// Price history
// ---------------------------------------------------------------------------

/// Parameters for the price history endpoint.
///
/// The backend accepts an optional `from_date`/`to_date` window; without one
/// it returns the provider's full daily series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Ticker symbol the series is for.
    pub symbol: String,
    /// Inclusive range start.
    pub from: Option<NaiveDate>,
    /// Inclusive range end.
    pub to: Option<NaiveDate>,
}

impl HistoryQuery {
    /// Full available series for `symbol`.
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            from: None,
            to: None,
        }
    }
}

/// Daily price history.
pub fn history(query: &HistoryQuery) -> String {
    let mut path = format!("/api/v1/fmp/historical-price/{}", encode(&query.symbol));
    let mut sep = '?';
    if let Some(from) = query.from {
        let _ = write!(path, "{sep}from_date={from}");
        sep = '&';
    }
    if let Some(to) = query.to {
        let _ = write!(path, "{sep}to_date={to}");
    }
    path
}
