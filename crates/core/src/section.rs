//! Section Catalog
//!
//! The fixed, ordered set of benchmark log sections, the per-section text
//! accumulator produced by the sectionizer, and the per-section analysis
//! record produced by a pipeline run.
//!
//! Declaration order of [`SectionId`] is the emission order for messages and
//! report sections. It has no influence on how the log is scanned beyond the
//! order in which boundary patterns are tried on each line.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// SectionId
// ============================================================================

/// A known section of a benchmark log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionId {
    Configuration,
    HardwareValues,
    Governor,
    Octane,
    GeekbenchGpu,
    Bandwidth,
    Mprime,
    Geekbench,
    GpuBurn,
    Fio,
    Sectors,
    Result,
    Checks,
}

impl SectionId {
    /// Every section in emission order.
    pub const ALL: [SectionId; 13] = [
        SectionId::Configuration,
        SectionId::HardwareValues,
        SectionId::Governor,
        SectionId::Octane,
        SectionId::GeekbenchGpu,
        SectionId::Bandwidth,
        SectionId::Mprime,
        SectionId::Geekbench,
        SectionId::GpuBurn,
        SectionId::Fio,
        SectionId::Sectors,
        SectionId::Result,
        SectionId::Checks,
    ];

    /// Human-facing label used in prompts, messages and report headings.
    pub fn label(&self) -> &'static str {
        match self {
            SectionId::Configuration => "Configuracion",
            SectionId::HardwareValues => "Valores",
            SectionId::Governor => "Gobernador",
            SectionId::Octane => "Octane",
            SectionId::GeekbenchGpu => "GeekbenchGPU",
            SectionId::Bandwidth => "Anchobanda",
            SectionId::Mprime => "Mprime",
            SectionId::Geekbench => "Geekbench",
            SectionId::GpuBurn => "GPU-BURN",
            SectionId::Fio => "FIO",
            SectionId::Sectors => "Sectores",
            SectionId::Result => "Resultado",
            SectionId::Checks => "Comprobaciones",
        }
    }

    /// Regular expression recognising the first line of the section.
    ///
    /// Patterns are unanchored searches over a single line.
    pub fn boundary_pattern(&self) -> &'static str {
        match self {
            SectionId::Configuration => {
                r"(?i)se van a ejecutar los siguientes scripts en secuencia"
            }
            SectionId::HardwareValues => r"Estadísticas del sistema",
            SectionId::Governor => r"Ejecutando Gobernador",
            SectionId::Octane => r"Ejecutando Octane",
            SectionId::GeekbenchGpu => r"Prueba en la GPU",
            SectionId::Bandwidth => r"Ejecutando STREAM Benchmark",
            SectionId::Mprime => r"Ejecutando Mprime",
            SectionId::Geekbench => r"Ejecutando Geekbench",
            SectionId::GpuBurn => r"Ejecutando GPU-BURN",
            SectionId::Fio => r"Ejecutando FIO",
            SectionId::Sectors => r"Ejecutando Sectores",
            SectionId::Result => r"Ejecutando Resultado",
            SectionId::Checks => r"Ejecutando Comprobaciones",
        }
    }

    /// Look a section up by its label (exact match).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.label() == label)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SectionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| CoreError::parse(format!("unknown section label: {}", s)))
    }
}

// ============================================================================
// SectionMap
// ============================================================================

/// Accumulated raw text per section.
///
/// Every [`SectionId`] is always present as a key, possibly with empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMap {
    texts: BTreeMap<SectionId, String>,
}

impl SectionMap {
    /// Create a map with every section present and empty.
    pub fn new() -> Self {
        Self {
            texts: SectionId::ALL.iter().map(|id| (*id, String::new())).collect(),
        }
    }

    /// Append one log line (a trailing newline is added).
    pub fn append_line(&mut self, section: SectionId, line: &str) {
        let text = self.texts.entry(section).or_default();
        text.push_str(line);
        text.push('\n');
    }

    /// Text accumulated for a section.
    pub fn text(&self, section: SectionId) -> &str {
        self.texts.get(&section).map(String::as_str).unwrap_or("")
    }

    /// Whether the section is a key of the map.
    pub fn contains(&self, section: SectionId) -> bool {
        self.texts.contains_key(&section)
    }

    /// All sections in emission order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &str)> {
        self.texts.iter().map(|(id, text)| (*id, text.as_str()))
    }

    /// Sections with non-blank text, in emission order.
    pub fn non_empty(&self) -> impl Iterator<Item = (SectionId, &str)> {
        self.iter().filter(|(_, text)| !text.trim().is_empty())
    }

    /// Number of keys (always the size of the catalog).
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Whether every section is blank.
    pub fn is_empty(&self) -> bool {
        self.non_empty().next().is_none()
    }
}

impl Default for SectionMap {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Analysis records
// ============================================================================

/// The verdict for one non-empty section of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub section: SectionId,
    pub analysis_text: String,
    pub is_anomalous: bool,
}

impl AnalysisRecord {
    pub fn new(section: SectionId, analysis_text: impl Into<String>, is_anomalous: bool) -> Self {
        Self {
            section,
            analysis_text: analysis_text.into(),
            is_anomalous,
        }
    }
}

/// GPU model names detected in the hardware values section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuRoster(Vec<String>);

impl GpuRoster {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
