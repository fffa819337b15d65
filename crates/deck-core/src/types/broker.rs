//! Brokerage account, position, and order models.
//!
//! These mirror the JSON the backend relays from the Alpaca API. Alpaca
//! encodes quantities and prices as decimal strings (`"150.25"`), so money
//! fields use [`rust_decimal::Decimal`], which deserializes from both string
//! and number encodings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// Trading account summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account UUID assigned by the broker.
    pub id: String,
    /// Human-facing account number.
    pub account_number: String,
    /// Broker-side account status, e.g. `"ACTIVE"`.
    pub status: String,
    /// ISO 4217 currency of the cash balances.
    pub currency: String,
    /// Settled cash.
    pub cash: Decimal,
    /// Total portfolio value (cash + long market value).
    pub portfolio_value: Decimal,
    /// Account equity.
    pub equity: Decimal,
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Side of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl std::fmt::Display for PositionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

/// One open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Ticker symbol, e.g. `"AAPL"`.
    pub symbol: String,
    /// Long or short.
    pub side: PositionSide,
    /// Number of shares held.
    pub qty: Decimal,
    /// Average entry price per share.
    pub avg_entry_price: Decimal,
    /// Latest known price per share.
    pub current_price: Decimal,
    /// Current market value of the position.
    pub market_value: Decimal,
    /// Unrealized profit/loss in account currency.
    pub unrealized_pl: Decimal,
    /// Unrealized profit/loss as a fraction (0.05 = 5 %).
    pub unrealized_plpc: Decimal,
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// One order as reported by the broker.
///
/// `order_type` and `status` stay plain strings: the broker's vocabulary for
/// them is open-ended and the dashboard only displays them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Broker-assigned order ID.
    pub id: String,
    /// Client-assigned order ID.
    pub client_order_id: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Buy or sell.
    pub side: OrderSide,
    /// Order type (wire field `type`), e.g. `"market"`.
    #[serde(rename = "type")]
    pub order_type: String,
    /// Order status, e.g. `"filled"`.
    pub status: String,
    /// Requested quantity. Absent for notional orders.
    #[serde(default)]
    pub qty: Option<Decimal>,
    /// Cumulative filled quantity.
    pub filled_qty: Decimal,
    /// Average fill price. Absent until the first fill.
    #[serde(default)]
    pub filled_avg_price: Option<Decimal>,
    /// Submission timestamp.
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Fill timestamp, if filled.
    #[serde(default)]
    pub filled_at: Option<chrono::DateTime<chrono::Utc>>,
}
