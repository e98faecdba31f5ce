//! Pipeline Integration Tests
//!
//! End-to-end runs of the orchestrator against the scripted oracle and the
//! in-memory channel.

use std::path::Path;
use std::sync::Arc;

use bench_verdict::services::notify::{ChannelCall, InMemoryChannel};
use bench_verdict::services::report::{Block, ReportBuilder, TextStyle};
use bench_verdict::{AppConfig, AppError, Orchestrator, ReportOutcome};
use bench_verdict_core::SectionId;
use bench_verdict_llm::ScriptedOracle;

const CLASSIFY_NEEDLE: &str = "Responde SOLO con ANOMALIA o OK.";

fn quiet_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.channel.chunk_delay_ms = 0;
    config.channel.section_delay_ms = 0;
    config.channel.escalation_user_id = Some("555".to_string());
    config.channel.parent_channel_id = "100".to_string();
    config
}

fn write_log(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn section_headings(records: &[bench_verdict_core::AnalysisRecord]) -> Vec<(String, TextStyle)> {
    ReportBuilder::new("test")
        .plan(records)
        .into_iter()
        .filter_map(|b| match b {
            Block::Heading { text, style, .. } => Some((text, style)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_single_result_section_all_green() {
    let dir = tempfile::tempdir().unwrap();
    write_log(
        dir.path(),
        "SRV-0001_final.txt",
        "preámbulo\nEjecutando Resultado\nOK — all green\n",
    );

    let oracle = Arc::new(
        ScriptedOracle::new()
            .respond_when(CLASSIFY_NEEDLE, "OK")
            .with_default("Resumen: todas las pruebas correctas."),
    );
    let channel = Arc::new(InMemoryChannel::new());
    let orchestrator = Orchestrator::new(quiet_config(), oracle.clone(), channel.clone()).unwrap();

    let summary = orchestrator.run_in_dir(dir.path()).await.unwrap();

    assert_eq!(summary.machine_id, "SRV-0001");
    assert_eq!(summary.records.len(), 1);
    assert_eq!(summary.records[0].section, SectionId::Result);
    assert!(!summary.records[0].is_anomalous);
    assert_eq!(oracle.call_count(), 2);

    let headings = section_headings(&summary.records);
    assert_eq!(headings, vec![("Resultado".to_string(), TextStyle::HEADING_OK)]);

    let messages = channel.posted_messages();
    assert_eq!(
        messages,
        vec!["**Resultado:**\nResumen: todas las pruebas correctas."]
    );
    assert!(!messages[0].contains("<@"));

    let report_path = dir.path().join("SRV-0001_informe.pdf");
    assert_eq!(
        summary.report,
        ReportOutcome::Uploaded {
            path: report_path.clone()
        }
    );
    assert!(report_path.exists());
    assert_eq!(
        channel.uploads(),
        vec![(
            report_path,
            Some("Adjunto informe completo en PDF.".to_string())
        )]
    );
}

#[tokio::test]
async fn test_mprime_anomaly_is_escalated() {
    let dir = tempfile::tempdir().unwrap();
    write_log(
        dir.path(),
        "SRV-0002_final.txt",
        "Ejecutando Mprime\nFrecuencia actual: 1200 MHz\nEjecutando FIO\nread: 1.2 GB/s\n",
    );

    let oracle = Arc::new(
        ScriptedOracle::new()
            .respond_when("OK.\n\nFrecuencia por debajo", "ANOMALIA")
            .respond_when("Sección 'Mprime'", "Frecuencia por debajo de la base")
            .respond_when(CLASSIFY_NEEDLE, "OK")
            .with_default("Velocidades correctas."),
    );
    let channel = Arc::new(InMemoryChannel::new());
    let orchestrator = Orchestrator::new(quiet_config(), oracle, channel.clone()).unwrap();

    let summary = orchestrator.run_in_dir(dir.path()).await.unwrap();
    assert_eq!(summary.anomalies(), 1);

    let messages = channel.posted_messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        messages[0],
        "<@555> posible incidencia en **Mprime**:\nFrecuencia por debajo de la base"
    );
    assert_eq!(messages[1], "**FIO:**\nVelocidades correctas.");

    let headings = section_headings(&summary.records);
    assert_eq!(headings[0], ("Mprime".to_string(), TextStyle::HEADING_ERROR));
    assert_eq!(headings[1], ("FIO".to_string(), TextStyle::HEADING_OK));
}

#[tokio::test]
async fn test_missing_input_makes_no_calls() {
    let dir = tempfile::tempdir().unwrap();
    write_log(dir.path(), "SRV_partial.txt", "Ejecutando FIO\n");

    let oracle = Arc::new(ScriptedOracle::new());
    let channel = Arc::new(InMemoryChannel::new());
    let orchestrator = Orchestrator::new(quiet_config(), oracle.clone(), channel.clone()).unwrap();

    let err = orchestrator.run_in_dir(dir.path()).await.unwrap_err();
    assert!(matches!(err, AppError::InputMissing(_)));
    assert!(err.is_fatal());
    assert_eq!(oracle.call_count(), 0);
    assert!(channel.calls().is_empty());
}

#[tokio::test]
async fn test_thread_failure_stops_before_analysis() {
    let dir = tempfile::tempdir().unwrap();
    write_log(dir.path(), "SRV-0003_final.txt", "Ejecutando FIO\nread: 1 GB/s\n");

    let oracle = Arc::new(ScriptedOracle::new().with_default("OK"));
    let channel = Arc::new(InMemoryChannel::new().failing_thread_creation());
    let orchestrator = Orchestrator::new(quiet_config(), oracle.clone(), channel.clone()).unwrap();

    let err = orchestrator.run_in_dir(dir.path()).await.unwrap_err();
    assert!(matches!(err, AppError::ThreadCreation(_)));
    assert!(err.is_fatal());
    assert_eq!(oracle.call_count(), 0);
    assert_eq!(channel.calls().len(), 1);
    assert!(!dir.path().join("SRV-0003_informe.pdf").exists());
}

// ============================================================================
// Ordering and recoverable failures
// ============================================================================

#[tokio::test]
async fn test_messages_follow_enumeration_order() {
    let dir = tempfile::tempdir().unwrap();
    write_log(
        dir.path(),
        "SRV-0004_final.txt",
        "Ejecutando Comprobaciones\nPCI ok\nEjecutando FIO\nread\nEjecutando Gobernador\nperformance\n",
    );

    let oracle = Arc::new(
        ScriptedOracle::new()
            .respond_when(CLASSIFY_NEEDLE, "OK")
            .with_default("bien"),
    );
    let channel = Arc::new(InMemoryChannel::new());
    let orchestrator = Orchestrator::new(quiet_config(), oracle, channel.clone()).unwrap();
    orchestrator.run_in_dir(dir.path()).await.unwrap();

    let headers: Vec<String> = channel
        .posted_messages()
        .iter()
        .map(|m| m.lines().next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(
        headers,
        vec!["**Gobernador:**", "**FIO:**", "**Comprobaciones:**"]
    );
}

#[tokio::test]
async fn test_post_failure_does_not_stop_run() {
    let dir = tempfile::tempdir().unwrap();
    write_log(
        dir.path(),
        "SRV-0005_final.txt",
        "Ejecutando FIO\nread\nEjecutando Sectores\nsin errores\n",
    );

    let oracle = Arc::new(
        ScriptedOracle::new()
            .respond_when(CLASSIFY_NEEDLE, "OK")
            .with_default("análisis"),
    );
    let channel = Arc::new(InMemoryChannel::new().failing_posts_containing("**FIO:**"));
    let orchestrator = Orchestrator::new(quiet_config(), oracle, channel.clone()).unwrap();

    let summary = orchestrator.run_in_dir(dir.path()).await.unwrap();
    assert_eq!(summary.records.len(), 2);
    assert_eq!(summary.messages_posted, 1);
    assert_eq!(channel.posted_messages().len(), 2);
    assert!(matches!(summary.report, ReportOutcome::Uploaded { .. }));
}

#[tokio::test]
async fn test_upload_failure_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    write_log(dir.path(), "SRV-0006_final.txt", "Ejecutando Resultado\nOK\n");

    let oracle = Arc::new(ScriptedOracle::new().with_default("OK"));
    let channel = Arc::new(InMemoryChannel::new().failing_uploads());
    let orchestrator = Orchestrator::new(quiet_config(), oracle, channel.clone()).unwrap();

    let summary = orchestrator.run_in_dir(dir.path()).await.unwrap();
    match summary.report {
        ReportOutcome::UploadFailed { path } => assert!(path.exists()),
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[tokio::test]
async fn test_long_analysis_is_chunked() {
    let dir = tempfile::tempdir().unwrap();
    write_log(dir.path(), "SRV-0007_final.txt", "Ejecutando Geekbench\nscore 2000\n");

    let long = "x".repeat(4000);
    let oracle = Arc::new(
        ScriptedOracle::new()
            .respond_when(CLASSIFY_NEEDLE, "OK")
            .with_default(long.clone()),
    );
    let channel = Arc::new(InMemoryChannel::new());
    let orchestrator = Orchestrator::new(quiet_config(), oracle, channel.clone()).unwrap();
    orchestrator.run_in_dir(dir.path()).await.unwrap();

    let messages = channel.posted_messages();
    let expected = format!("**Geekbench:**\n{}", long);
    let total = expected.chars().count();
    assert_eq!(messages.len(), total.div_ceil(1900));
    assert!(messages.iter().all(|m| m.chars().count() <= 1900));
    assert_eq!(messages.concat(), expected);
}

#[tokio::test]
async fn test_output_dir_override_and_thread_name() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("informes");
    write_log(dir.path(), "SRV-0008_final.txt", "Ejecutando FIO\nread\n");

    let mut config = quiet_config();
    config.output_dir = Some(out.clone());
    let oracle = Arc::new(ScriptedOracle::new().with_default("OK"));
    let channel = Arc::new(InMemoryChannel::new());
    let orchestrator = Orchestrator::new(config, oracle, channel.clone()).unwrap();
    orchestrator.run_in_dir(dir.path()).await.unwrap();

    assert!(out.join("SRV-0008_informe.pdf").exists());
    match &channel.calls()[0] {
        ChannelCall::CreateThread(request) => assert_eq!(request.name, "Análisis SRV-0008"),
        other => panic!("unexpected first call {:?}", other),
    }
}
