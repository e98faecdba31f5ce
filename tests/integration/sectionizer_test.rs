//! Sectionizer Integration Tests
//!
//! Sectioning of a full benchmark log and GPU roster extraction from its
//! hardware values section.

use bench_verdict::services::gpu_roster::extract_gpu_roster;
use bench_verdict::services::sectionizer::Sectionizer;
use bench_verdict_core::SectionId;

const FULL_LOG: &str = "\
arranque del equipo
Se van a ejecutar los siguientes scripts en secuencia:
  gobernador.sh fio.sh resultado.sh
Estadísticas del sistema
- CPU: AMD EPYC 7543
- GPUs NVIDIA CUDA: 2 (RTX 4090, RTX A6000)
Ejecutando Gobernador
performance
Ejecutando Octane
La puntuación de la tarjeta gráfica es: 1310
Ejecutando Mprime
Frecuencia actual: 3400 MHz
Ejecutando FIO
read: 3.1 GB/s
Ejecutando Resultado
OK
";

// ============================================================================
// Sectioning
// ============================================================================

#[test]
fn test_full_log_sections_in_emission_order() {
    let map = Sectionizer::new().unwrap().sectionize(FULL_LOG);

    let found: Vec<SectionId> = map.non_empty().map(|(id, _)| id).collect();
    assert_eq!(
        found,
        vec![
            SectionId::Configuration,
            SectionId::HardwareValues,
            SectionId::Governor,
            SectionId::Octane,
            SectionId::Mprime,
            SectionId::Fio,
            SectionId::Result,
        ]
    );
    assert_eq!(map.len(), SectionId::ALL.len());
}

#[test]
fn test_every_line_after_first_boundary_is_kept_once() {
    let map = Sectionizer::new().unwrap().sectionize(FULL_LOG);

    let assigned: usize = map.iter().map(|(_, text)| text.lines().count()).sum();
    let after_preamble = FULL_LOG.lines().count() - 1;
    assert_eq!(assigned, after_preamble);
    assert!(!map.iter().any(|(_, text)| text.contains("arranque del equipo")));
}

#[test]
fn test_section_text_starts_with_its_boundary_line() {
    let sectionizer = Sectionizer::new().unwrap();
    let map = sectionizer.sectionize(FULL_LOG);

    for (id, text) in map.non_empty() {
        let first = text.lines().next().unwrap();
        assert_eq!(sectionizer.boundary_of(first), Some(id));
    }
}

#[test]
fn test_repeated_boundary_reopens_section() {
    let log = "Ejecutando FIO\nrun 1\nEjecutando Resultado\nOK\nEjecutando FIO\nrun 2\n";
    let map = Sectionizer::new().unwrap().sectionize(log);

    assert_eq!(
        map.text(SectionId::Fio),
        "Ejecutando FIO\nrun 1\nEjecutando FIO\nrun 2\n"
    );
    assert_eq!(map.text(SectionId::Result), "Ejecutando Resultado\nOK\n");
}

#[test]
fn test_log_without_boundaries_is_empty() {
    let map = Sectionizer::new().unwrap().sectionize("nada que ver\notra línea\n");
    assert!(map.is_empty());
    assert_eq!(map.non_empty().count(), 0);
}

// ============================================================================
// GPU roster
// ============================================================================

#[test]
fn test_roster_from_sectioned_hardware_values() {
    let map = Sectionizer::new().unwrap().sectionize(FULL_LOG);
    let roster = extract_gpu_roster(map.text(SectionId::HardwareValues));
    assert_eq!(roster.names(), ["RTX 4090", "RTX A6000"]);
}

#[test]
fn test_roster_ignores_other_sections() {
    let log = "Ejecutando Octane\n- GPUs NVIDIA CUDA: 1 (RTX 3090)\n";
    let map = Sectionizer::new().unwrap().sectionize(log);
    let roster = extract_gpu_roster(map.text(SectionId::HardwareValues));
    assert!(roster.is_empty());
}
