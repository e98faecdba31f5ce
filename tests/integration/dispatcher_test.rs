//! Dispatcher Integration Tests
//!
//! Message chunking and escalation through the notification dispatcher on
//! top of the in-memory channel.

use std::sync::Arc;

use bench_verdict::services::notify::{
    chunk_message, ChannelCall, ChannelConfig, InMemoryChannel, NotificationDispatcher,
    MAX_MESSAGE_CHARS,
};
use bench_verdict_core::{AnalysisRecord, SectionId};

fn quiet_config(escalation: Option<&str>) -> ChannelConfig {
    ChannelConfig {
        escalation_user_id: escalation.map(str::to_string),
        chunk_delay_ms: 0,
        section_delay_ms: 0,
        ..Default::default()
    }
}

// ============================================================================
// Chunking
// ============================================================================

#[test]
fn test_chunk_count_and_rejoin() {
    let text: String = "ñandú ".repeat(700);
    let length = text.chars().count();

    for budget in [1, 7, 1900, MAX_MESSAGE_CHARS, length, length + 1] {
        let chunks = chunk_message(&text, budget);
        assert_eq!(chunks.len(), length.div_ceil(budget), "budget {}", budget);
        assert!(chunks.iter().all(|c| c.chars().count() <= budget));
        assert_eq!(chunks.concat(), text);
    }
}

#[test]
fn test_chunk_empty_text() {
    assert!(chunk_message("", 1900).is_empty());
}

// ============================================================================
// Section messages
// ============================================================================

#[tokio::test]
async fn test_anomalous_section_mentions_admin() {
    let channel = Arc::new(InMemoryChannel::new());
    let dispatcher = NotificationDispatcher::new(channel.clone(), &quiet_config(Some("999")));
    let thread = dispatcher.open_thread("Análisis M1").await.unwrap();

    let record = AnalysisRecord::new(SectionId::GpuBurn, "Temperatura excesiva", true);
    let ids = dispatcher.post_section(&thread, &record).await;

    assert_eq!(ids.len(), 1);
    assert_eq!(
        channel.posted_messages(),
        vec!["<@999> posible incidencia en **GPU-BURN**:\nTemperatura excesiva"]
    );
}

#[tokio::test]
async fn test_blank_admin_is_treated_as_absent() {
    let channel = Arc::new(InMemoryChannel::new());
    let dispatcher = NotificationDispatcher::new(channel.clone(), &quiet_config(Some("  ")));
    let thread = dispatcher.open_thread("Análisis M2").await.unwrap();

    let record = AnalysisRecord::new(SectionId::Sectors, "Sectores reasignados: 12", true);
    dispatcher.post_section(&thread, &record).await;

    assert_eq!(
        channel.posted_messages(),
        vec!["posible incidencia en **Sectores**:\nSectores reasignados: 12"]
    );
}

#[tokio::test]
async fn test_long_section_message_goes_to_same_thread() {
    let channel = Arc::new(InMemoryChannel::new());
    let config = ChannelConfig {
        chunk_budget: 100,
        ..quiet_config(None)
    };
    let dispatcher = NotificationDispatcher::new(channel.clone(), &config);
    let thread = dispatcher.open_thread("Análisis M3").await.unwrap();

    let record = AnalysisRecord::new(SectionId::Bandwidth, "a".repeat(250), false);
    let ids = dispatcher.post_section(&thread, &record).await;
    assert_eq!(ids.len(), 3);

    let threads: Vec<_> = channel
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            ChannelCall::Post { thread, .. } => Some(thread),
            _ => None,
        })
        .collect();
    assert_eq!(threads, vec![thread.clone(), thread.clone(), thread]);
}
