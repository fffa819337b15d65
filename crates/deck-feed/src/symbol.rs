//! The selected-symbol cell.

use std::sync::Arc;

use tokio::sync::watch;

/// Symbol shown before the operator picks anything.
pub const DEFAULT_SYMBOL: &str = "AAPL";

/// Shared cell holding the chart's selected ticker symbol.
///
/// Clones share one cell. Selecting a new symbol notifies subscribers (the
/// aggregator refetches history, nothing else); re-selecting the current
/// symbol is a no-op and wakes nobody. Values are normalized to uppercase,
/// matching how the backend treats tickers.
#[derive(Debug, Clone)]
pub struct SymbolSelector {
    cell: Arc<watch::Sender<String>>,
}

impl SymbolSelector {
    pub fn new(initial: &str) -> Self {
        let (tx, _) = watch::channel(normalize(initial));
        Self { cell: Arc::new(tx) }
    }

    /// Current selection.
    pub fn get(&self) -> String {
        self.cell.borrow().clone()
    }

    /// Change the selection. Returns `true` if the value actually changed.
    pub fn set(&self, symbol: &str) -> bool {
        let normalized = normalize(symbol);
        self.cell.send_if_modified(|current| {
            if *current == normalized {
                false
            } else {
                *current = normalized;
                true
            }
        })
    }

    /// Receiver for change notifications.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.cell.subscribe()
    }
}

impl Default for SymbolSelector {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL)
    }
}

/// Uppercase and trimmed; blank input falls back to the default.
fn normalize(raw: &str) -> String {
    let symbol = raw.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        DEFAULT_SYMBOL.to_string()
    } else {
        symbol
    }
}
