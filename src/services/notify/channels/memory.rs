//! In-Memory Channel
//!
//! Records every call instead of sending it. Used by tests and dry runs;
//! individual operations can be made to fail.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use super::MessageChannel;
use crate::services::notify::types::*;

/// One recorded channel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelCall {
    CreateThread(ThreadRequest),
    Post {
        thread: ThreadId,
        content: String,
    },
    Upload {
        thread: ThreadId,
        path: PathBuf,
        caption: Option<String>,
        size: u64,
    },
}

/// Channel double that keeps calls in memory.
#[derive(Debug, Default)]
pub struct InMemoryChannel {
    calls: Mutex<Vec<ChannelCall>>,
    fail_thread: bool,
    fail_uploads: bool,
    fail_posts_containing: Vec<String>,
}

impl InMemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_thread` answer with HTTP 403.
    pub fn failing_thread_creation(mut self) -> Self {
        self.fail_thread = true;
        self
    }

    /// Make `upload_file` answer with HTTP 413.
    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    /// Reject posts whose content contains `needle`.
    pub fn failing_posts_containing(mut self, needle: impl Into<String>) -> Self {
        self.fail_posts_containing.push(needle.into());
        self
    }

    /// All recorded calls, including failed ones.
    pub fn calls(&self) -> Vec<ChannelCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Contents of the posted messages, in order.
    pub fn posted_messages(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChannelCall::Post { content, .. } => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Recorded uploads as `(path, caption)` pairs.
    pub fn uploads(&self) -> Vec<(PathBuf, Option<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ChannelCall::Upload { path, caption, .. } => Some((path, caption)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ChannelCall) -> usize {
        match self.calls.lock() {
            Ok(mut calls) => {
                calls.push(call);
                calls.len()
            }
            Err(_) => 0,
        }
    }
}

#[async_trait]
impl MessageChannel for InMemoryChannel {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create_thread(&self, request: &ThreadRequest) -> Result<ThreadId, ChannelError> {
        let seq = self.record(ChannelCall::CreateThread(request.clone()));
        if self.fail_thread {
            return Err(ChannelError::HttpError {
                status: 403,
                body: "Missing Permissions".to_string(),
            });
        }
        Ok(ThreadId(format!("thread-{}", seq)))
    }

    async fn post_message(
        &self,
        thread: &ThreadId,
        content: &str,
    ) -> Result<MessageId, ChannelError> {
        let seq = self.record(ChannelCall::Post {
            thread: thread.clone(),
            content: content.to_string(),
        });
        if self
            .fail_posts_containing
            .iter()
            .any(|needle| content.contains(needle.as_str()))
        {
            return Err(ChannelError::HttpError {
                status: 500,
                body: "Internal Server Error".to_string(),
            });
        }
        Ok(MessageId(format!("message-{}", seq)))
    }

    async fn upload_file(
        &self,
        thread: &ThreadId,
        path: &Path,
        caption: Option<&str>,
    ) -> Result<MessageId, ChannelError> {
        let size = tokio::fs::metadata(path).await.map(|m| m.len()).unwrap_or(0);
        let seq = self.record(ChannelCall::Upload {
            thread: thread.clone(),
            path: path.to_path_buf(),
            caption: caption.map(str::to_string),
            size,
        });
        if self.fail_uploads {
            return Err(ChannelError::HttpError {
                status: 413,
                body: "Request entity too large".to_string(),
            });
        }
        Ok(MessageId(format!("message-{}", seq)))
    }

    async fn test(&self) -> Result<ChannelTestResult, ChannelError> {
        Ok(ChannelTestResult {
            success: true,
            latency_ms: Some(0),
            error: None,
        })
    }
}
