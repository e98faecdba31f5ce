//! Message Channel Trait
//!
//! Defines the async trait every message channel implementation must
//! satisfy, plus channel module exports.

pub mod discord;
pub mod memory;

use std::path::Path;

use async_trait::async_trait;

use super::types::{ChannelError, ChannelTestResult, MessageId, ThreadId, ThreadRequest};

pub use discord::DiscordChannel;
pub use memory::{ChannelCall, InMemoryChannel};

/// Async trait for threaded messaging channels.
///
/// Implementations talk to one parent channel; the thread identifier
/// returned by `create_thread` is passed back to every later call.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Channel identifier used in logs.
    fn name(&self) -> &'static str;

    /// Create a discussion thread under the parent channel.
    async fn create_thread(&self, request: &ThreadRequest) -> Result<ThreadId, ChannelError>;

    /// Post a single message to a thread.
    async fn post_message(&self, thread: &ThreadId, content: &str)
        -> Result<MessageId, ChannelError>;

    /// Upload a file to a thread with an optional caption.
    async fn upload_file(
        &self,
        thread: &ThreadId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<MessageId, ChannelError>;

    /// Verify the credential and endpoint.
    async fn test(&self) -> Result<ChannelTestResult, ChannelError>;
}
