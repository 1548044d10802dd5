//! End-to-end tests of the page layout pipeline on synthetic dictionary pages.

use columnfix::{
    BBox, BoundaryConfidence, ColumnDetector, HocrTitle, LayoutError, LayoutOptions,
    LayoutWarningCode, Line, Page, PageLayoutPipeline, PageStatus, RegionChild, TextRegion,
};

/// A region of `n` lines, each 700px wide, starting at (`left`, `top`).
fn column_region(label: &str, left: i32, top: i32, n: usize) -> TextRegion {
    let lines = (0..n)
        .map(|i| {
            let t = top + 35 * i as i32;
            Line::new(BBox::new(left, t, left + 700, t + 30), format!("{label} {i}"))
        })
        .collect();
    TextRegion::from_lines(lines).expect("non-empty region")
}

fn region_boxes(page: &Page) -> Vec<BBox> {
    page.regions.iter().map(|r| r.bbox).collect()
}

#[test]
fn three_tight_clusters_detected() {
    let page = Page::new(vec![
        column_region("a", 100, 100, 30),
        column_region("b", 900, 100, 30),
        column_region("c", 1700, 100, 30),
    ]);
    let options = LayoutOptions::default();
    let layout = ColumnDetector::new(&options).detect_page(&page).unwrap();

    let expected = [100, 900, 1700];
    for (detected, expected) in layout.boundaries.as_slice().iter().zip(expected) {
        assert!(
            (detected - expected).abs() <= options.margin,
            "boundary {detected} not within margin of {expected}"
        );
    }
    assert_eq!(layout.line_counts, [30, 30, 30]);
    assert!(layout.short_columns.is_empty());
    assert_eq!(layout.confidence, BoundaryConfidence::Detected);
}

#[test]
fn sparse_page_passes_through_unchanged() {
    let mut page = Page::new(vec![
        column_region("plate", 400, 600, 6),
        column_region("caption", 400, 2800, 4),
    ])
    .with_page_number(12);
    let before = format!("{page:?}");
    let original = page.clone();

    let report = PageLayoutPipeline::default().run(&mut page);

    assert_eq!(page, original);
    assert_eq!(format!("{page:?}"), before);
    assert!(report.is_skipped());
    assert_eq!(
        report.status,
        PageStatus::Skipped(LayoutError::InsufficientSignal {
            found: 10,
            required: 30
        })
    );
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].code, LayoutWarningCode::PageSkipped);
    assert_eq!(report.warnings[0].page, Some(12));
}

#[test]
fn split_column_and_margin_noise_corrected() {
    let col1_top = column_region("a", 100, 100, 20);
    let col1_bottom = column_region("a'", 100, 850, 20);
    let expected_col1 = col1_top.bbox.union(&col1_bottom.bbox);
    let noise = TextRegion::from_lines(vec![Line::new(BBox::new(8, 1400, 52, 1440), "|")])
        .expect("non-empty region");
    let noise_box = noise.bbox;

    let mut page = Page::new(vec![
        noise,
        col1_top,
        column_region("b", 900, 100, 40),
        col1_bottom,
        column_region("c", 1700, 100, 40),
    ]);

    let report = PageLayoutPipeline::default().run(&mut page);

    assert_eq!(report.status, PageStatus::Corrected);
    assert_eq!(report.regions_before(), Some(5));
    assert_eq!(report.regions_after(), Some(3));
    assert_eq!(page.regions.len(), 3);
    assert_eq!(report.removed_margin(), [noise_box]);
    assert_eq!(page.regions[0].bbox, expected_col1);
    assert_eq!(page.regions[0].line_count(), 40);
    assert!(page.regions.iter().all(TextRegion::is_clean));

    let codes: Vec<LayoutWarningCode> = report.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, [LayoutWarningCode::MarginRegionRemoved]);
    assert!(report.warnings[0].description.contains("8 1400 52 1440"));
}

#[test]
fn samples_report_column_heads_and_tails() {
    let mut page = Page::new(vec![
        column_region("a", 100, 100, 30),
        column_region("b", 900, 100, 30),
        column_region("c", 1700, 100, 30),
    ]);
    let report = PageLayoutPipeline::default().run(&mut page);
    let samples = report.samples();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].first.as_deref(), Some("a 0"));
    assert_eq!(samples[0].last.as_deref(), Some("a 29"));
    assert_eq!(samples[2].first.as_deref(), Some("c 0"));
    assert_eq!(samples[2].last.as_deref(), Some("c 29"));
}

#[test]
fn merger_idempotent_on_corrected_page() {
    let mut page = Page::new(vec![
        column_region("a", 100, 100, 20),
        column_region("a", 100, 850, 20),
        column_region("b", 900, 100, 40),
        column_region("c", 1700, 100, 40),
    ]);
    let options = LayoutOptions {
        min_regions_to_merge: 1,
        ..LayoutOptions::default()
    };
    let pipeline = PageLayoutPipeline::new(options);

    pipeline.run(&mut page);
    let once = page.clone();
    let report = pipeline.run(&mut page);

    assert_eq!(page, once);
    assert_eq!(report.regions_before(), Some(3));
    assert_eq!(report.regions_after(), Some(3));
    assert!(report.is_clean());
}

#[test]
fn short_column_and_mismatch_do_not_abort() {
    // column three is mostly missing and column one has an unmergeable sliver
    let mut page = Page::new(vec![
        column_region("a", 100, 100, 40),
        column_region("sliver", 600, 1700, 2),
        column_region("b", 900, 100, 40),
        column_region("c", 1700, 100, 8),
    ]);

    let report = PageLayoutPipeline::default().run(&mut page);

    assert_eq!(report.status, PageStatus::Corrected);
    assert_eq!(page.regions.len(), 4);
    let short: Vec<usize> = report.short_columns().iter().map(|s| s.column).collect();
    assert_eq!(short, [2]);
    let mismatch = report
        .merge
        .as_ref()
        .and_then(|m| m.region_count_mismatch.clone())
        .expect("mismatch reported");
    assert_eq!(mismatch, region_boxes(&page));
    assert_eq!(
        report
            .warnings_with(LayoutWarningCode::RegionCountMismatch)
            .count(),
        1
    );
}

#[test]
fn nested_regions_travel_with_their_parent() {
    let inner = column_region("a", 100, 850, 20);
    let outer = TextRegion::new(inner.bbox, vec![RegionChild::Region(inner)]);
    let mut page = Page::new(vec![
        column_region("a", 100, 100, 20),
        outer,
        column_region("b", 900, 100, 40),
        column_region("c", 1700, 100, 40),
    ]);

    let report = PageLayoutPipeline::default().run(&mut page);

    assert_eq!(report.regions_after(), Some(3));
    let merged = &page.regions[0];
    assert_eq!(merged.line_count(), 40);
    assert!(matches!(merged.children.last(), Some(RegionChild::Region(_))));
}

#[test]
fn hocr_titles_round_trip_through_correction() {
    let titles = [
        "bbox 100 100 800 795; x_wconf 88",
        "bbox 100 850 800 1545; x_wconf 91",
        "bbox 900 100 1600 1495",
        "bbox 1700 100 2400 1495",
    ];
    let parsed: Vec<HocrTitle> = titles.iter().map(|t| t.parse().unwrap()).collect();
    let line_counts = [20, 20, 40, 40];

    let regions = parsed
        .iter()
        .zip(line_counts)
        .map(|(title, n)| column_region("x", title.bbox.left, title.bbox.top, n))
        .collect();
    let mut page = Page::new(regions);
    for (region, title) in page.regions.iter().zip(&parsed) {
        assert_eq!(region.bbox, title.bbox);
    }

    PageLayoutPipeline::default().run(&mut page);

    let mut first = parsed[0].clone();
    first.bbox = page.regions[0].bbox;
    assert_eq!(first.to_string(), "bbox 100 100 800 1545; x_wconf 88");
    assert_eq!(page.regions[1].bbox.to_string(), "900 100 1600 1495");
}

#[test]
fn extreme_parsed_coordinates_degrade_without_panicking() {
    let cluster = |left: i64, top: i64, n: usize| {
        let lines = (0..n as i64)
            .map(|i| {
                let t = top + 35 * i;
                let bbox: BBox = format!("{left} {t} {} {}", left + 700, t + 30)
                    .parse()
                    .unwrap();
                Line::new(bbox, format!("{left}/{i}"))
            })
            .collect();
        TextRegion::from_lines(lines).expect("non-empty region")
    };
    let mut page = Page::new(vec![
        cluster(-2_000_000_000, 100, 10),
        cluster(-2_000_000_000, 500, 10),
        cluster(2_000_000_000, 100, 10),
        cluster(2_000_000_000, 500, 10),
    ]);

    let report = PageLayoutPipeline::default().run(&mut page);

    assert_eq!(report.status, PageStatus::Corrected);
    assert!(report.used_fallback());
    let columns = report.columns.as_ref().expect("columns detected");
    assert_eq!(
        columns.boundaries.as_slice(),
        [0, 999_999_995, 1_999_999_990]
    );
    assert_eq!(columns.line_counts, [20, 0, 20]);
    assert_eq!(report.removed_margin().len(), 2);
    assert_eq!(page.regions.len(), 1);
    assert_eq!(page.regions[0].line_count(), 20);
    assert_eq!(
        report
            .warnings_with(LayoutWarningCode::RegionCountMismatch)
            .count(),
        1
    );
}
