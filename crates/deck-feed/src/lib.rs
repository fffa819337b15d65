//! # deck-feed
//!
//! Read side of the operational deck. Owns the five data sources as
//! independently tracked state cells, coordinates fetch dispatch, and exposes
//! point-in-time snapshots for rendering.
//!
//! | Module       | Responsibility                                     |
//! |--------------|----------------------------------------------------|
//! | `tracker`    | per-source fetch lifecycle, stale-result discard   |
//! | `aggregator` | dispatch coordination, snapshots, loading gate     |
//! | `symbol`     | shared selected-symbol cell                        |
//! | `clock`      | independent 1 Hz wall-clock ticker                 |

pub mod aggregator;
pub mod clock;
pub mod symbol;
pub mod tracker;

pub use aggregator::{Aggregator, DeckSnapshot};
pub use clock::WallClock;
pub use symbol::{DEFAULT_SYMBOL, SymbolSelector};
pub use tracker::SourceTracker;
