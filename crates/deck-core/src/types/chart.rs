//! Daily price history for the chart panel.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of most-recent points the chart keeps.
///
/// The price API returns the full daily series newest-first; everything past
/// this cutoff is discarded before the data reaches a consumer.
pub const HISTORY_POINTS: usize = 30;

/// One daily bar from the price history API.
///
/// The provider sends camelCase field names and omits some fields for thin
/// symbols, so everything beyond the OHLC core is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day (`"2024-01-05"`).
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Split/dividend adjusted close.
    #[serde(rename = "adjClose", default)]
    pub adj_close: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<Decimal>,
    /// Day-over-day change in percent.
    #[serde(rename = "changePercent", default)]
    pub change_percent: Option<Decimal>,
    /// Volume-weighted average price.
    #[serde(default)]
    pub vwap: Option<Decimal>,
    /// Provider display label (`"January 05, 24"`).
    #[serde(default)]
    pub label: Option<String>,
}
