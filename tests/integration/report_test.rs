//! Report Integration Tests
//!
//! Multi-page reports: index page numbers, jump targets, running footer
//! and the rendered PDF structure.

use bench_verdict::services::report::layout::paginate;
use bench_verdict::services::report::{PageGeometry, ReportBuilder};
use bench_verdict_core::{AnalysisRecord, SectionId};

fn long_records() -> Vec<AnalysisRecord> {
    SectionId::ALL
        .iter()
        .rev()
        .enumerate()
        .map(|(i, id)| {
            let text = (0..40)
                .map(|n| format!("Línea {} del análisis de {} con valores medidos", n, id))
                .collect::<Vec<_>>()
                .join("\n");
            AnalysisRecord::new(*id, text, i % 4 == 0)
        })
        .collect()
}

fn fixed_time() -> chrono::NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2026, 5, 20)
        .unwrap()
        .and_hms_opt(18, 30, 0)
        .unwrap()
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_toc_pages_match_heading_destinations() {
    let builder = ReportBuilder::new("SRV-42").generated_at(fixed_time());
    let blocks = builder.plan(&long_records());
    let layout = paginate(&blocks, &PageGeometry::a4(), "SRV-42");

    assert_eq!(layout.toc.len(), SectionId::ALL.len());
    assert!(layout.page_count() > 4);

    let titles: Vec<&str> = layout.toc.iter().map(|e| e.title.as_str()).collect();
    let labels: Vec<&str> = SectionId::ALL.iter().map(|id| id.label()).collect();
    assert_eq!(titles, labels);

    assert_eq!(layout.toc[0].page, 3);
    for pair in layout.toc.windows(2) {
        assert!(pair[0].page <= pair[1].page);
    }
    for entry in &layout.toc {
        let dest = layout
            .destinations
            .iter()
            .find(|d| d.anchor == entry.anchor)
            .unwrap();
        assert_eq!(dest.page_index + 1, entry.page);
        assert!(entry.page <= layout.page_count());
    }
}

#[test]
fn test_every_page_has_numbered_footer() {
    let builder = ReportBuilder::new("SRV-42").generated_at(fixed_time());
    let layout = paginate(&builder.plan(&long_records()), &PageGeometry::a4(), "SRV-42");

    for (i, page) in layout.pages.iter().enumerate() {
        let footer = format!("Página {} | SRV-42", i + 1);
        assert!(
            page.texts.iter().any(|t| t.text == footer),
            "page {} lacks footer",
            i + 1
        );
    }
}

#[test]
fn test_index_links_point_at_known_anchors() {
    let builder = ReportBuilder::new("SRV-42").generated_at(fixed_time());
    let layout = paginate(&builder.plan(&long_records()), &PageGeometry::a4(), "SRV-42");

    let links: Vec<&str> = layout
        .pages
        .iter()
        .flat_map(|p| p.links.iter().map(|l| l.anchor.as_str()))
        .collect();
    assert_eq!(links.len(), layout.toc.len());
    assert!(links
        .iter()
        .all(|a| layout.destinations.iter().any(|d| d.anchor == *a)));
}

// ============================================================================
// Rendered PDF
// ============================================================================

#[test]
fn test_rendered_pdf_structure() {
    let report = ReportBuilder::new("SRV-42")
        .generated_at(fixed_time())
        .build(&long_records())
        .unwrap();

    let doc = lopdf::Document::load_mem(&report.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), report.page_count);

    let catalog = doc.catalog().unwrap();
    assert!(catalog.get(b"Outlines").is_ok());
    assert!(catalog.get(b"Dests").is_ok());
    assert_eq!(report.file_name(), "SRV-42_informe.pdf");
}

#[test]
fn test_repeated_build_is_stable() {
    let builder = ReportBuilder::new("SRV-7").generated_at(fixed_time());
    let records = long_records();

    let first = builder.build(&records).unwrap();
    let second = builder.build(&records).unwrap();
    assert_eq!(first.page_count, second.page_count);
    assert_eq!(first.toc, second.toc);
}
