//! Report Builder
//!
//! Builds the paginated PDF report for one run: cover page, table of
//! contents, then one color-coded section per analysis record.
//!
//! The build is split in three steps:
//! 1. [`ReportBuilder::plan`] produces the logical [`Block`] sequence
//! 2. [`layout::paginate`] places it on pages and resolves index numbers
//! 3. [`render::render_pdf`] emits the final bytes

pub mod layout;
pub mod render;
pub mod style;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use bench_verdict_core::AnalysisRecord;

use crate::utils::error::AppResult;
use crate::utils::paths::{ensure_dir, report_file_name};

pub use layout::{Block, LaidOutDocument, PageGeometry, TocEntry};
pub use render::DocumentInfo;
pub use style::TextStyle;

/// One centimetre in points.
const CM: f32 = 28.346_457;

/// Builds reports for one machine.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    machine_id: String,
    generated_at: NaiveDateTime,
    geometry: PageGeometry,
}

/// A rendered report, held in memory until written.
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub machine_id: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub toc: Vec<TocEntry>,
}

impl ReportDocument {
    /// Conventional file name for this report.
    pub fn file_name(&self) -> String {
        report_file_name(&self.machine_id)
    }

    /// Write the report into `dir`, returning the file path.
    pub fn write_to(&self, dir: &Path) -> AppResult<PathBuf> {
        ensure_dir(dir)?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

impl ReportBuilder {
    pub fn new(machine_id: impl Into<String>) -> Self {
        Self {
            machine_id: machine_id.into(),
            generated_at: chrono::Local::now().naive_local(),
            geometry: PageGeometry::a4(),
        }
    }

    /// Override the generation timestamp shown on the cover.
    pub fn generated_at(mut self, at: NaiveDateTime) -> Self {
        self.generated_at = at;
        self
    }

    /// Logical content of the report, sections in enumeration order.
    pub fn plan(&self, records: &[AnalysisRecord]) -> Vec<Block> {
        let mut blocks = vec![
            Block::Spacer(2.0 * CM),
            paragraph(
                format!("Informe de Benchmark: {}", self.machine_id),
                TextStyle::TITLE,
            ),
            Block::Spacer(0.5 * CM),
            paragraph(format!("Máquina: {}", self.machine_id), TextStyle::BODY),
            paragraph(
                format!(
                    "Fecha de generación: {}",
                    self.generated_at.format("%Y-%m-%d %H:%M:%S")
                ),
                TextStyle::BODY,
            ),
            Block::PageBreak,
            paragraph("Índice de contenido", TextStyle::HEADING),
            Block::TableOfContents,
            Block::PageBreak,
        ];

        let mut ordered: Vec<&AnalysisRecord> = records.iter().collect();
        ordered.sort_by_key(|record| record.section);

        let mut anchors = AnchorRegistry::default();
        for record in ordered {
            let title = record.section.label().to_string();
            blocks.push(Block::Heading {
                anchor: anchors.register(&title),
                text: title,
                style: TextStyle::section_heading(record.is_anomalous),
            });
            blocks.push(Block::Spacer(0.2 * CM));
            for line in record.analysis_text.lines() {
                if line.trim().is_empty() {
                    blocks.push(Block::Spacer(TextStyle::BODY.leading));
                } else {
                    blocks.push(paragraph(line, TextStyle::BODY));
                }
            }
            blocks.push(Block::Spacer(0.5 * CM));
        }
        blocks
    }

    /// Lay out and render the report.
    pub fn build(&self, records: &[AnalysisRecord]) -> AppResult<ReportDocument> {
        let blocks = self.plan(records);
        let layout = layout::paginate(&blocks, &self.geometry, &self.machine_id);
        let info = DocumentInfo {
            title: format!("Informe de Benchmark: {}", self.machine_id),
            subject: self.machine_id.clone(),
            created: self.generated_at,
        };
        let bytes = render::render_pdf(&layout, &info)?;

        tracing::info!(
            machine = %self.machine_id,
            sections = records.len(),
            pages = layout.page_count(),
            bytes = bytes.len(),
            "report built"
        );

        Ok(ReportDocument {
            machine_id: self.machine_id.clone(),
            bytes,
            page_count: layout.page_count(),
            toc: layout.toc,
        })
    }
}

fn paragraph(text: impl Into<String>, style: TextStyle) -> Block {
    Block::Paragraph {
        text: text.into(),
        style,
    }
}

/// Hands out unique jump-target keys derived from heading text.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    used: HashSet<String>,
}

impl AnchorRegistry {
    /// Key for `heading`: whitespace runs become `_`, other characters
    /// outside `[A-Za-z0-9_-]` are dropped, and repeats get `_2`, `_3`, ...
    pub fn register(&mut self, heading: &str) -> String {
        let base = normalize_anchor(heading);
        let mut candidate = base.clone();
        let mut n = 1;
        while self.used.contains(&candidate) {
            n += 1;
            candidate = format!("{}_{}", base, n);
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

fn normalize_anchor(heading: &str) -> String {
    let collapsed = heading.split_whitespace().collect::<Vec<_>>().join("_");
    let key: String = collapsed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if key.is_empty() {
        "section".to_string()
    } else {
        key
    }
}
