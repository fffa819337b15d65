//! Core data types for the dashboard.
//!
//! Wire models (`bot`, `broker`, `chart`) deserialize the backend's JSON
//! as-is; `source` holds the lifecycle machinery the feed layer wraps them in.

pub mod bot;
pub mod broker;
pub mod chart;
pub mod source;

pub use bot::*;
pub use broker::*;
pub use chart::*;
pub use source::*;
