//! Notification Dispatch
//!
//! Threaded message channels and the dispatcher that posts a run's results.

pub mod channels;
pub mod dispatcher;
pub mod types;

pub use channels::{ChannelCall, DiscordChannel, InMemoryChannel, MessageChannel};
pub use dispatcher::{chunk_message, format_section_message, NotificationDispatcher};
pub use types::*;
