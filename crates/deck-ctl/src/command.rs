//! Control actions the operator can submit.

use deck_core::types::SourceId;

/// A bot control action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// Start the bot on one symbol.
    Start { symbol: String },
    /// Stop the bot.
    Stop,
}

impl BotCommand {
    /// Start command for `symbol`. Callers pass the selected symbol, which
    /// is already uppercase-normalized.
    pub fn start(symbol: impl Into<String>) -> Self {
        Self::Start {
            symbol: symbol.into(),
        }
    }

    /// Short name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Stop => "stop",
        }
    }

    /// Sources whose cached state this action makes stale once it succeeds.
    ///
    /// The controller fires these through the refresh channel after a
    /// successful submit. A failed submit fires nothing.
    pub fn invalidates(&self) -> &'static [SourceId] {
        match self {
            Self::Start { .. } => &[SourceId::BotStatus],
            Self::Stop => &[SourceId::BotStatus],
        }
    }
}

impl std::fmt::Display for BotCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start { symbol } => write!(f, "start {symbol}"),
            Self::Stop => write!(f, "stop"),
        }
    }
}
