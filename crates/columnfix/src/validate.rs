//! Post-merge checks and the per-page diagnostic report.
//!
//! [`LayoutValidator`] performs no geometry of its own: it turns the
//! findings of column detection and merging into [`LayoutWarning`]s and
//! bundles everything into a [`LayoutReport`].

use columnfix_core::{BBox, LayoutError, LayoutWarning, LayoutWarningCode};

use crate::columns::{COLUMN_COUNT, ColumnLayout, ColumnSample, ShortColumn};
use crate::merge::MergeReport;

/// Outcome of the pipeline for one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageStatus {
    /// Columns were detected and the regions corrected.
    Corrected,
    /// Column detection was undetermined; the page was left untouched.
    Skipped(LayoutError),
}

/// Diagnostics for one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutReport {
    pub page_number: Option<usize>,
    pub status: PageStatus,
    /// Column detection result; `None` for skipped pages.
    pub columns: Option<ColumnLayout>,
    /// Merge result; `None` for skipped pages.
    pub merge: Option<MergeReport>,
    /// Every anomaly found, in detection order.
    pub warnings: Vec<LayoutWarning>,
}

impl LayoutReport {
    /// Returns true if the page was passed through unmodified.
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, PageStatus::Skipped(_))
    }

    /// Returns true if there are no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Region count before merging, if the merger ran.
    pub fn regions_before(&self) -> Option<usize> {
        self.merge.as_ref().map(|m| m.regions_before)
    }

    /// Region count after merging, if the merger ran.
    pub fn regions_after(&self) -> Option<usize> {
        self.merge.as_ref().map(|m| m.regions_after)
    }

    /// Boxes of regions removed as left-margin noise.
    pub fn removed_margin(&self) -> &[BBox] {
        self.merge
            .as_ref()
            .map(|m| m.removed_margin.as_slice())
            .unwrap_or_default()
    }

    /// Columns that received too few lines.
    pub fn short_columns(&self) -> &[ShortColumn] {
        self.columns
            .as_ref()
            .map(|c| c.short_columns.as_slice())
            .unwrap_or_default()
    }

    /// Returns true if the middle boundary came from the midpoint fallback.
    pub fn used_fallback(&self) -> bool {
        self.columns.as_ref().is_some_and(ColumnLayout::used_fallback)
    }

    /// First and last line text per column.
    pub fn samples(&self) -> &[ColumnSample] {
        self.columns
            .as_ref()
            .map(|c| c.samples.as_slice())
            .unwrap_or_default()
    }

    /// Warnings with the given code.
    pub fn warnings_with(&self, code: LayoutWarningCode) -> impl Iterator<Item = &LayoutWarning> {
        self.warnings.iter().filter(move |w| w.code == code)
    }
}

/// Aggregates detector and merger findings into a [`LayoutReport`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutValidator;

impl LayoutValidator {
    /// Report for a page whose columns could not be determined.
    pub fn skipped(&self, page_number: Option<usize>, reason: LayoutError) -> LayoutReport {
        let warning = LayoutWarning::new(
            LayoutWarningCode::PageSkipped,
            format!("layout correction skipped: {reason}"),
        )
        .on_page(page_number);
        log_warning(&warning);

        LayoutReport {
            page_number,
            status: PageStatus::Skipped(reason),
            columns: None,
            merge: None,
            warnings: vec![warning],
        }
    }

    /// Report for a corrected page.
    pub fn validate(
        &self,
        page_number: Option<usize>,
        columns: ColumnLayout,
        merge: MergeReport,
    ) -> LayoutReport {
        let mut warnings = Vec::new();
        let mut warn = |code, description: String| {
            let warning = LayoutWarning::new(code, description).on_page(page_number);
            log_warning(&warning);
            warnings.push(warning);
        };

        if columns.used_fallback() {
            warn(
                LayoutWarningCode::BoundaryFallback,
                format!(
                    "middle column boundary undetected, using midpoint {}",
                    columns.boundaries.left(1).unwrap_or_default()
                ),
            );
        }

        for short in &columns.short_columns {
            warn(
                LayoutWarningCode::ShortColumn,
                format!(
                    "column {} holds {} of {} lines ({:.1}%)",
                    short.column,
                    short.lines,
                    columns.total_lines,
                    short.fraction * 100.0
                ),
            );
        }

        for bbox in &merge.removed_margin {
            warn(
                LayoutWarningCode::MarginRegionRemoved,
                format!("removed left-margin region bbox {bbox}"),
            );
        }

        if let Some(boxes) = &merge.region_count_mismatch {
            let listing = boxes
                .iter()
                .map(|b| format!("[{b}]"))
                .collect::<Vec<_>>()
                .join(" ");
            warn(
                LayoutWarningCode::RegionCountMismatch,
                format!(
                    "expected {COLUMN_COUNT} regions, found {}: {listing}",
                    boxes.len()
                ),
            );
        }

        for overlap in &merge.overlaps {
            let relation = if overlap.nested { "nests in" } else { "overlaps" };
            warn(
                LayoutWarningCode::OverlappingRegions,
                format!(
                    "region [{}] {relation} region [{}]",
                    overlap.first, overlap.second
                ),
            );
        }

        LayoutReport {
            page_number,
            status: PageStatus::Corrected,
            columns: Some(columns),
            merge: Some(merge),
            warnings,
        }
    }
}

fn log_warning(warning: &LayoutWarning) {
    #[cfg(feature = "tracing")]
    tracing::warn!(code = %warning.code, page = ?warning.page, "{}", warning.description);
    #[cfg(not(feature = "tracing"))]
    let _ = warning;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{BoundaryConfidence, ColumnBoundaries};
    use crate::merge::RegionOverlap;

    fn layout() -> ColumnLayout {
        ColumnLayout {
            boundaries: ColumnBoundaries::new(90, 890, 1690),
            confidence: BoundaryConfidence::Detected,
            total_lines: 90,
            line_counts: [30, 30, 30],
            short_columns: Vec::new(),
            samples: Vec::new(),
            common_left_edges: Vec::new(),
            common_right_edges: Vec::new(),
        }
    }

    fn merged(after: usize) -> MergeReport {
        MergeReport {
            regions_before: 4,
            regions_after: after,
            ..MergeReport::default()
        }
    }

    #[test]
    fn test_clean_page_has_no_warnings() {
        let report = LayoutValidator.validate(Some(30), layout(), merged(3));
        assert_eq!(report.status, PageStatus::Corrected);
        assert!(report.is_clean());
        assert!(!report.is_skipped());
        assert_eq!(report.regions_before(), Some(4));
        assert_eq!(report.regions_after(), Some(3));
        assert!(!report.used_fallback());
    }

    #[test]
    fn test_skipped_report() {
        let reason = LayoutError::InsufficientSignal {
            found: 10,
            required: 30,
        };
        let report = LayoutValidator.skipped(Some(1), reason.clone());
        assert!(report.is_skipped());
        assert_eq!(report.status, PageStatus::Skipped(reason));
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, LayoutWarningCode::PageSkipped);
        assert_eq!(report.warnings[0].page, Some(1));
        assert!(report.regions_after().is_none());
        assert!(report.removed_margin().is_empty());
        assert!(report.samples().is_empty());
    }

    #[test]
    fn test_every_anomaly_becomes_a_warning() {
        let mut columns = layout();
        columns.confidence = BoundaryConfidence::MidpointFallback;
        columns.short_columns.push(ShortColumn {
            column: 2,
            lines: 9,
            fraction: 0.1,
        });
        let mut merge = merged(4);
        merge.removed_margin.push(BBox::new(5, 1500, 60, 1530));
        merge.region_count_mismatch = Some(vec![
            BBox::new(100, 100, 800, 1500),
            BBox::new(600, 1600, 800, 1700),
            BBox::new(900, 100, 1600, 3000),
            BBox::new(1700, 100, 2400, 3000),
        ]);
        merge.overlaps.push(RegionOverlap {
            first: BBox::new(100, 100, 800, 1500),
            second: BBox::new(200, 200, 300, 300),
            nested: true,
        });

        let report = LayoutValidator.validate(None, columns, merge);
        let codes: Vec<LayoutWarningCode> = report.warnings.iter().map(|w| w.code).collect();
        assert_eq!(
            codes,
            [
                LayoutWarningCode::BoundaryFallback,
                LayoutWarningCode::ShortColumn,
                LayoutWarningCode::MarginRegionRemoved,
                LayoutWarningCode::RegionCountMismatch,
                LayoutWarningCode::OverlappingRegions,
            ]
        );
        assert!(report.used_fallback());
        assert_eq!(report.short_columns().len(), 1);
        assert_eq!(report.removed_margin(), [BBox::new(5, 1500, 60, 1530)]);

        let short = report.warnings_with(LayoutWarningCode::ShortColumn).next().unwrap();
        assert_eq!(short.description, "column 2 holds 9 of 90 lines (10.0%)");
        let mismatch = report
            .warnings_with(LayoutWarningCode::RegionCountMismatch)
            .next()
            .unwrap();
        assert!(mismatch.description.starts_with("expected 3 regions, found 4"));
        assert!(mismatch.description.contains("[600 1600 800 1700]"));
        let overlap = report
            .warnings_with(LayoutWarningCode::OverlappingRegions)
            .next()
            .unwrap();
        assert!(overlap.description.contains("nests in"));
    }
}
