//! # deck-ctl
//!
//! Write side of the operational deck: bot control actions, their submission
//! path, and the operator notice feed.
//!
//! Control never touches feed state directly. A successful action pushes the
//! command's invalidation edges through the refresh channel and the feed
//! refetches on its own; a failed action only produces an error notice.

pub mod command;
pub mod controller;
pub mod notice;

pub use command::BotCommand;
pub use controller::Controller;
pub use notice::{Notice, NoticeFeed, NoticeLevel};
