//! Error and warning types for columnfix.
//!
//! Provides [`LayoutError`] for conditions that stop an operation,
//! [`LayoutWarning`] for non-fatal anomalies found while correcting a page,
//! and [`LayoutWarningCode`] for categorizing them.

use std::fmt;

use thiserror::Error;

/// Errors raised while decoding geometry or analysing a page.
///
/// Only the bounding-box codec surfaces these to callers directly; the page
/// pipeline converts detection errors into a skipped-page report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutError {
    /// A bounding-box string was not four ordered integers.
    #[error("malformed bounding box {input:?}: {reason}")]
    MalformedBoundingBox {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The page has too few lines to infer column structure.
    #[error("insufficient signal: {found} lines on page, at least {required} required")]
    InsufficientSignal {
        /// Lines present on the page.
        found: usize,
        /// Configured minimum.
        required: usize,
    },

    /// No gap between populated left-edge bins was wide enough to mark the
    /// rightmost column.
    #[error("no column gap wider than {min_gap}px among line left edges")]
    NoColumnGap {
        /// Configured minimum gap.
        min_gap: i32,
    },
}

/// Machine-readable code for a layout anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutWarningCode {
    /// Column detection was undetermined; the page passed through unchanged.
    PageSkipped,
    /// The middle boundary fell back to the midpoint of its neighbours.
    BoundaryFallback,
    /// A column received less than the expected share of lines.
    ShortColumn,
    /// The merged page does not have the expected number of regions.
    RegionCountMismatch,
    /// A region left of the first column was removed.
    MarginRegionRemoved,
    /// Two surviving regions overlap or nest.
    OverlappingRegions,
}

impl LayoutWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutWarningCode::PageSkipped => "PAGE_SKIPPED",
            LayoutWarningCode::BoundaryFallback => "BOUNDARY_FALLBACK",
            LayoutWarningCode::ShortColumn => "SHORT_COLUMN",
            LayoutWarningCode::RegionCountMismatch => "REGION_COUNT_MISMATCH",
            LayoutWarningCode::MarginRegionRemoved => "MARGIN_REGION_REMOVED",
            LayoutWarningCode::OverlappingRegions => "OVERLAPPING_REGIONS",
        }
    }
}

impl fmt::Display for LayoutWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal anomaly found while correcting a page.
///
/// Warnings never abort processing; they are collected into the page report
/// so the caller can decide whether to accept, retry, or flag the page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutWarning {
    /// Machine-readable warning code.
    pub code: LayoutWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number the warning belongs to, if known.
    pub page: Option<usize>,
}

impl LayoutWarning {
    /// Create a warning with a code and description.
    pub fn new(code: LayoutWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
        }
    }

    /// Attach a page number, returning the modified warning.
    pub fn on_page(mut self, page: Option<usize>) -> Self {
        self.page = page;
        self
    }
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        Ok(())
    }
}
