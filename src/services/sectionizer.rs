//! Sectionizer
//!
//! Splits a raw benchmark log into named sections with a single forward
//! pass over its lines.

use regex::Regex;

use bench_verdict_core::{SectionId, SectionMap};

use crate::utils::error::AppResult;

/// Compiled boundary patterns, checked in enumeration order.
#[derive(Debug, Clone)]
pub struct Sectionizer {
    boundaries: Vec<(SectionId, Regex)>,
}

impl Sectionizer {
    pub fn new() -> AppResult<Self> {
        let boundaries = SectionId::ALL
            .iter()
            .map(|id| Ok((*id, Regex::new(id.boundary_pattern())?)))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self { boundaries })
    }

    /// Section whose boundary the line matches; first match wins.
    pub fn boundary_of(&self, line: &str) -> Option<SectionId> {
        self.boundaries
            .iter()
            .find(|(_, pattern)| pattern.is_match(line))
            .map(|(id, _)| *id)
    }

    /// Assign every line to the section opened by the latest boundary.
    ///
    /// Lines end at `\n`, `\r\n` or a lone `\r` (progress output that
    /// redraws in place). Lines before the first boundary are discarded. A
    /// boundary seen again reopens the same accumulator.
    pub fn sectionize(&self, raw: &str) -> SectionMap {
        let mut sections = SectionMap::new();
        let mut current: Option<SectionId> = None;

        for line in raw.lines().flat_map(|line| line.split('\r')) {
            if let Some(id) = self.boundary_of(line) {
                current = Some(id);
            }
            if let Some(id) = current {
                sections.append_line(id, line);
            }
        }

        tracing::debug!(
            sections = sections.non_empty().count(),
            "log sectionized"
        );
        sections
    }
}
