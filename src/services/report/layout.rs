//! Report Layout
//!
//! Turns a sequence of logical blocks into positioned text on pages.
//! The table of contents needs the final page of every heading, so layout
//! runs repeatedly, feeding the heading pages of one pass into the index
//! of the next, until the page numbers no longer change.

use std::collections::HashMap;

use super::style::{Align, TextStyle};

/// Upper bound on layout passes before the last result is accepted.
const MAX_PASSES: usize = 4;

// ============================================================================
// Input blocks
// ============================================================================

/// A logical unit of report content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Vertical gap in points.
    Spacer(f32),
    Paragraph {
        text: String,
        style: TextStyle,
    },
    /// A heading registered as index entry, jump target and bookmark.
    Heading {
        text: String,
        style: TextStyle,
        anchor: String,
    },
    /// Placeholder expanded into one line per heading.
    TableOfContents,
    PageBreak,
}

/// An index line with its resolved page number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub anchor: String,
    /// 1-based page number
    pub page: usize,
}

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    /// Distance of the footer baseline below the bottom margin.
    pub footer_offset: f32,
}

impl PageGeometry {
    /// A4 portrait with one-inch margins.
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_left: 72.0,
            margin_right: 72.0,
            margin_top: 72.0,
            margin_bottom: 72.0,
            footer_offset: 14.17,
        }
    }

    pub fn frame_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    fn frame_top(&self) -> f32 {
        self.height - self.margin_top
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

// ============================================================================
// Output
// ============================================================================

/// A single line of text at a baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub style: TextStyle,
}

/// Clickable rectangle jumping to an anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkArea {
    /// `[x0, y0, x1, y1]` in page coordinates
    pub rect: [f32; 4],
    pub anchor: String,
}

/// Where a heading ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    pub anchor: String,
    pub title: String,
    /// 0-based page index
    pub page_index: usize,
    /// Top edge of the heading line
    pub top: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub texts: Vec<PlacedText>,
    pub links: Vec<LinkArea>,
}

/// Fully paginated report.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutDocument {
    pub geometry: PageGeometry,
    pub pages: Vec<PageLayout>,
    pub destinations: Vec<Destination>,
    pub toc: Vec<TocEntry>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Lay out `blocks`, resolving index page numbers, and add the running footer.
pub fn paginate(blocks: &[Block], geometry: &PageGeometry, footer_label: &str) -> LaidOutDocument {
    let mut toc = collect_toc(blocks);
    let mut pass = 0;

    let mut doc = loop {
        pass += 1;
        let doc = layout_pass(blocks, geometry, &toc);
        let resolved = resolve_pages(&toc, &doc.destinations);
        if resolved == toc || pass >= MAX_PASSES {
            break LaidOutDocument { toc: resolved, ..doc };
        }
        toc = resolved;
    };

    tracing::debug!(passes = pass, pages = doc.pages.len(), "report paginated");
    add_footers(&mut doc, footer_label);
    doc
}

fn collect_toc(blocks: &[Block]) -> Vec<TocEntry> {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Heading { text, anchor, .. } => Some(TocEntry {
                title: text.clone(),
                anchor: anchor.clone(),
                page: 0,
            }),
            _ => None,
        })
        .collect()
}

fn resolve_pages(toc: &[TocEntry], destinations: &[Destination]) -> Vec<TocEntry> {
    let pages: HashMap<&str, usize> = destinations
        .iter()
        .map(|d| (d.anchor.as_str(), d.page_index + 1))
        .collect();
    toc.iter()
        .map(|entry| TocEntry {
            page: pages.get(entry.anchor.as_str()).copied().unwrap_or(0),
            ..entry.clone()
        })
        .collect()
}

fn add_footers(doc: &mut LaidOutDocument, footer_label: &str) {
    let geometry = doc.geometry;
    let style = TextStyle::FOOTER;
    for (index, page) in doc.pages.iter_mut().enumerate() {
        let text = format!("Página {} | {}", index + 1, footer_label);
        let x = geometry.width - geometry.margin_right - style.text_width(&text);
        page.texts.push(PlacedText {
            x,
            y: geometry.margin_bottom - geometry.footer_offset,
            text,
            style,
        });
    }
}

/// Cursor over the page being filled.
struct Cursor<'a> {
    geometry: &'a PageGeometry,
    pages: Vec<PageLayout>,
    y: f32,
    /// Whether anything was placed on the current page.
    dirty: bool,
}

impl<'a> Cursor<'a> {
    fn new(geometry: &'a PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![PageLayout::default()],
            y: geometry.frame_top(),
            dirty: false,
        }
    }

    fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    fn current(&mut self) -> &mut PageLayout {
        let index = self.page_index();
        &mut self.pages[index]
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.y = self.geometry.frame_top();
        self.dirty = false;
    }

    fn remaining(&self) -> f32 {
        self.y - self.geometry.margin_bottom
    }

    /// Space before a block, dropped at the top of a page.
    fn space_before(&mut self, amount: f32) {
        if self.dirty {
            self.advance(amount);
        }
    }

    fn advance(&mut self, amount: f32) {
        if amount > self.remaining() {
            self.new_page();
        } else {
            self.y -= amount;
            self.dirty = true;
        }
    }

    /// Ensure `height` fits, breaking the page when it does not.
    fn reserve(&mut self, height: f32) {
        if height > self.remaining() && self.dirty {
            self.new_page();
        }
    }

    /// Place one line; returns its top edge.
    fn line(&mut self, text: &str, style: &TextStyle) -> f32 {
        self.reserve(style.leading);
        let top = self.y;
        let frame_left = self.geometry.margin_left + style.left_indent;
        let frame_width = self.geometry.frame_width() - style.left_indent;
        let x = match style.align {
            Align::Left => frame_left,
            Align::Center => frame_left + (frame_width - style.text_width(text)) / 2.0,
            Align::Right => frame_left + frame_width - style.text_width(text),
        };
        let y = self.y - style.size;
        self.current().texts.push(PlacedText {
            x,
            y,
            text: text.to_string(),
            style: *style,
        });
        self.y -= style.leading;
        self.dirty = true;
        top
    }
}

fn layout_pass(blocks: &[Block], geometry: &PageGeometry, toc: &[TocEntry]) -> LaidOutDocument {
    let mut cursor = Cursor::new(geometry);
    let mut destinations = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        match block {
            Block::Spacer(height) => cursor.advance(*height),
            Block::PageBreak => {
                if cursor.dirty {
                    cursor.new_page();
                }
            }
            Block::Paragraph { text, style } => {
                cursor.space_before(style.space_before);
                let width = geometry.frame_width() - style.left_indent;
                for line in wrap_text(text, style, width) {
                    cursor.line(&line, style);
                }
                cursor.advance(style.space_after);
            }
            Block::Heading {
                text,
                style,
                anchor,
            } => {
                cursor.space_before(style.space_before);
                // Keep the heading with the gap and first line that follow.
                let following = next_line_height(&blocks[index + 1..]);
                cursor.reserve(style.leading + style.space_after + following);
                let width = geometry.frame_width() - style.left_indent;
                let mut top = None;
                for line in wrap_text(text, style, width) {
                    let line_top = cursor.line(&line, style);
                    top.get_or_insert((cursor.page_index(), line_top));
                }
                if let Some((page_index, top)) = top {
                    destinations.push(Destination {
                        anchor: anchor.clone(),
                        title: text.clone(),
                        page_index,
                        top,
                    });
                }
                cursor.advance(style.space_after);
            }
            Block::TableOfContents => {
                let style = TextStyle::TOC_ENTRY;
                for entry in toc {
                    cursor.space_before(style.space_before);
                    let top = cursor.line(&entry.title, &style);
                    let number = entry.page.to_string();
                    let number_x = geometry.width - geometry.margin_right - style.text_width(&number);
                    let baseline = top - style.size;
                    let page = cursor.current();
                    page.texts.push(PlacedText {
                        x: number_x,
                        y: baseline,
                        text: number,
                        style,
                    });
                    page.links.push(LinkArea {
                        rect: [
                            geometry.margin_left,
                            top - style.leading,
                            geometry.width - geometry.margin_right,
                            top,
                        ],
                        anchor: entry.anchor.clone(),
                    });
                }
            }
        }
    }

    let mut pages = cursor.pages;
    // A trailing page break leaves an empty last page.
    if pages.len() > 1 && pages.last().is_some_and(|p| p.texts.is_empty()) {
        pages.pop();
    }

    LaidOutDocument {
        geometry: *geometry,
        pages,
        destinations,
        toc: toc.to_vec(),
    }
}

/// Vertical space up to and including the first paragraph line in `rest`.
/// Zero when another heading or a break comes first.
fn next_line_height(rest: &[Block]) -> f32 {
    let mut gap = 0.0;
    for block in rest {
        match block {
            Block::Spacer(height) => gap += height,
            Block::Paragraph { style, .. } => return gap + style.space_before + style.leading,
            Block::Heading { .. } | Block::PageBreak | Block::TableOfContents => return 0.0,
        }
    }
    0.0
}

/// Greedy word wrap to `width` points. Words wider than a line are split
/// by character. Always yields at least one line.
pub fn wrap_text(text: &str, style: &TextStyle, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if style.text_width(&candidate) <= width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if style.text_width(word) <= width {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                current.push(ch);
                if style.text_width(&current) > width {
                    current.pop();
                    lines.push(std::mem::replace(&mut current, ch.to_string()));
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
