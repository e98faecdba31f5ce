//! Notification Dispatcher
//!
//! Sequences thread creation, per-section messages and the report upload on
//! top of a [`MessageChannel`]. Per-call failures are logged and swallowed;
//! only thread creation reports its error to the caller.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bench_verdict_core::AnalysisRecord;

use super::channels::MessageChannel;
use super::types::{ChannelConfig, ChannelError, MessageId, ThreadId, ThreadRequest};

/// Posts one run's results to a thread, in order and paced.
pub struct NotificationDispatcher {
    channel: Arc<dyn MessageChannel>,
    escalation_user_id: Option<String>,
    auto_archive_minutes: u32,
    thread_greeting: String,
    chunk_budget: usize,
    chunk_delay: Duration,
    section_delay: Duration,
}

impl NotificationDispatcher {
    pub fn new(channel: Arc<dyn MessageChannel>, config: &ChannelConfig) -> Self {
        Self {
            channel,
            escalation_user_id: config
                .escalation_user_id
                .clone()
                .filter(|id| !id.trim().is_empty()),
            auto_archive_minutes: config.auto_archive_minutes,
            thread_greeting: config.thread_greeting.clone(),
            chunk_budget: config.chunk_budget.max(1),
            chunk_delay: Duration::from_millis(config.chunk_delay_ms),
            section_delay: Duration::from_millis(config.section_delay_ms),
        }
    }

    /// Create the run's thread. The only dispatcher error that propagates.
    pub async fn open_thread(&self, name: &str) -> Result<ThreadId, ChannelError> {
        let request = ThreadRequest {
            name: name.to_string(),
            auto_archive_minutes: self.auto_archive_minutes,
            initial_message: self.thread_greeting.clone(),
        };
        let thread = self.channel.create_thread(&request).await?;
        tracing::info!(channel = self.channel.name(), thread = %thread, name, "thread created");
        Ok(thread)
    }

    /// Post one message; failures are logged and yield `None`.
    pub async fn post_message(&self, thread: &ThreadId, text: &str) -> Option<MessageId> {
        match self.channel.post_message(thread, text).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(thread = %thread, error = %e, "failed to post message");
                None
            }
        }
    }

    /// Post `text` as consecutive messages of at most `chunk_budget` characters.
    pub async fn post_long_message(&self, thread: &ThreadId, text: &str) -> Vec<MessageId> {
        let chunks = chunk_message(text, self.chunk_budget);
        tracing::debug!(thread = %thread, chunks = chunks.len(), "posting long message");

        let mut ids = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            if let Some(id) = self.post_message(thread, chunk).await {
                ids.push(id);
            }
            pause(self.chunk_delay).await;
        }
        ids
    }

    /// Upload a file; failures are logged and yield `None`.
    pub async fn upload_file(
        &self,
        thread: &ThreadId,
        path: &Path,
        caption: Option<&str>,
    ) -> Option<MessageId> {
        match self.channel.upload_file(thread, path, caption).await {
            Ok(id) => {
                tracing::info!(thread = %thread, path = %path.display(), "file uploaded");
                Some(id)
            }
            Err(e) => {
                tracing::warn!(thread = %thread, path = %path.display(), error = %e, "failed to upload file");
                None
            }
        }
    }

    /// Post a section verdict, escalating anomalies, then wait the section delay.
    pub async fn post_section(&self, thread: &ThreadId, record: &AnalysisRecord) -> Vec<MessageId> {
        let message = format_section_message(record, self.escalation_user_id.as_deref());
        let ids = self.post_long_message(thread, &message).await;
        pause(self.section_delay).await;
        ids
    }
}

/// Message text for a section verdict.
///
/// Anomalous records mention the escalation user when one is configured.
pub fn format_section_message(record: &AnalysisRecord, escalation_user_id: Option<&str>) -> String {
    let label = record.section.label();
    if record.is_anomalous {
        match escalation_user_id {
            Some(user) => format!(
                "<@{}> posible incidencia en **{}**:\n{}",
                user, label, record.analysis_text
            ),
            None => format!("posible incidencia en **{}**:\n{}", label, record.analysis_text),
        }
    } else {
        format!("**{}:**\n{}", label, record.analysis_text)
    }
}

/// Split `text` into pieces of at most `budget` characters.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
/// Empty input yields no pieces.
pub fn chunk_message(text: &str, budget: usize) -> Vec<String> {
    let budget = budget.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == budget {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
