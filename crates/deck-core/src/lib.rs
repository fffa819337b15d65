//! # deck-core
//!
//! Core crate for the trading-bot operational deck, providing:
//!
//! - **Types** (`types`): source lifecycle, bot, brokerage, and chart models
//! - **Errors** (`error`): the fetch failure taxonomy
//! - **Configuration** (`config`): backend base URL resolution
//! - **Backend API** (`api`): the REST surface as an async trait, plus the
//!   reqwest implementation
//! - **Refresh channel** (`refresh`): cross-layer source invalidation
//! - **Logging** (`logging`): tracing-based structured logging

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod refresh;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;
