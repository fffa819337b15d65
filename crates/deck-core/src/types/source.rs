//! Source lifecycle types shared by the feed and control layers.
//!
//! Every dashboard data source is modeled as a single cell holding a
//! [`SourceState`]. Consumers render directly from the cell, so there is no
//! separate "stale" flag: a refetch moves the cell back to `Loading` and the
//! previous payload is gone.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SourceState
// ---------------------------------------------------------------------------

/// Lifecycle of one dashboard data source.
///
/// Exactly one variant holds at any time. `Error` carries an
/// operator-readable reason string, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceState<T> {
    /// A request is in flight and no usable payload exists yet.
    Loading,
    /// The last request failed.
    Error(String),
    /// The last request succeeded.
    Ready(T),
}

impl<T> SourceState<T> {
    /// Returns `true` while a request is in flight.
    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns `true` if the last request failed.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns `true` if a payload is available.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The payload, if the source is `Ready`.
    #[inline]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// The failure reason, if the source is `Error`.
    #[inline]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Sources start out loading; there is no "empty" state.
impl<T> Default for SourceState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

// ---------------------------------------------------------------------------
// SourceId
// ---------------------------------------------------------------------------

/// Identifies one of the five dashboard data sources.
///
/// Used as the routing key for refresh requests and as the label on tracker
/// log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    BotStatus,
    Account,
    Positions,
    Orders,
    History,
}

impl SourceId {
    /// All sources, in dispatch order.
    pub const ALL: [SourceId; 5] = [
        SourceId::BotStatus,
        SourceId::Account,
        SourceId::Positions,
        SourceId::Orders,
        SourceId::History,
    ];

    /// Whether this source gates the deck-wide loading indicator.
    ///
    /// Chart history is excluded: the deck is usable while the chart is
    /// still filling in.
    #[inline]
    pub fn is_critical(self) -> bool {
        !matches!(self, SourceId::History)
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BotStatus => write!(f, "bot-status"),
            Self::Account => write!(f, "account"),
            Self::Positions => write!(f, "positions"),
            Self::Orders => write!(f, "orders"),
            Self::History => write!(f, "history"),
        }
    }
}

impl std::str::FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bot-status" | "bot" => Ok(Self::BotStatus),
            "account" => Ok(Self::Account),
            "positions" => Ok(Self::Positions),
            "orders" => Ok(Self::Orders),
            "history" | "chart" => Ok(Self::History),
            other => Err(format!("unknown source '{other}'")),
        }
    }
}
