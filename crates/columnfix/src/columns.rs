//! Column boundary detection from line edge statistics.
//!
//! Lines are a more reliable segmentation unit than OCR regions, so the
//! three column left boundaries are inferred from the distribution of line
//! left edges alone. The region tree is never modified here.

use std::iter;

use columnfix_core::{LayoutError, Line, Page};

use crate::histogram::{EdgeCount, EdgeHistogram};
use crate::options::LayoutOptions;

/// Number of columns on a page.
pub const COLUMN_COUNT: usize = 3;

/// Left boundaries of the three columns, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnBoundaries {
    lefts: [i32; COLUMN_COUNT],
}

impl ColumnBoundaries {
    pub fn new(col1: i32, col2: i32, col3: i32) -> Self {
        Self {
            lefts: [col1, col2, col3],
        }
    }

    /// Boundaries as a slice, suitable for [`columnfix_core::BBox::column_index`].
    pub fn as_slice(&self) -> &[i32] {
        &self.lefts
    }

    /// Left boundary of column `index`.
    pub fn left(&self, index: usize) -> Option<i32> {
        self.lefts.get(index).copied()
    }

    /// Bucket a line by its left edge.
    ///
    /// Lines are known-good, so a plain threshold is used instead of the
    /// margin-aware region classification.
    pub fn line_column(&self, left: i32) -> usize {
        let [_, col2, col3] = self.lefts;
        if left >= col3 {
            2
        } else if left <= col2 {
            0
        } else {
            1
        }
    }
}

/// How the middle boundary was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryConfidence {
    /// Found from the left-edge cluster pattern.
    Detected,
    /// No cluster pattern; midpoint of the outer boundaries used instead.
    MidpointFallback,
}

/// A column holding less than the expected share of lines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShortColumn {
    pub column: usize,
    pub lines: usize,
    /// Share of all page lines, in `0.0..=1.0`.
    pub fraction: f64,
}

/// First and last line of a column in vertical order, for spot-checking
/// header and footer alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSample {
    pub column: usize,
    pub line_count: usize,
    pub first: Option<String>,
    pub last: Option<String>,
}

/// Result of column detection on one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnLayout {
    pub boundaries: ColumnBoundaries,
    pub confidence: BoundaryConfidence,
    /// Total lines considered.
    pub total_lines: usize,
    /// Lines bucketed into each column.
    pub line_counts: [usize; COLUMN_COUNT],
    pub short_columns: Vec<ShortColumn>,
    pub samples: Vec<ColumnSample>,
    /// Most common line left edges, most frequent first.
    pub common_left_edges: Vec<EdgeCount>,
    /// Most common line right edges, most frequent first.
    pub common_right_edges: Vec<EdgeCount>,
}

impl ColumnLayout {
    /// Returns true if the midpoint fallback was used for the middle boundary.
    pub fn used_fallback(&self) -> bool {
        self.confidence == BoundaryConfidence::MidpointFallback
    }
}

/// Infers the three column boundaries of a page from its lines.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDetector<'a> {
    options: &'a LayoutOptions,
}

impl<'a> ColumnDetector<'a> {
    pub fn new(options: &'a LayoutOptions) -> Self {
        Self { options }
    }

    /// Detect columns from every line on `page`, including nested regions.
    pub fn detect_page(&self, page: &Page) -> Result<ColumnLayout, LayoutError> {
        let lines: Vec<&Line> = page.lines().collect();
        self.detect(&lines)
    }

    /// Detect columns from a set of lines.
    ///
    /// Returns [`LayoutError::InsufficientSignal`] when there are fewer than
    /// `min_lines` lines and [`LayoutError::NoColumnGap`] when the rightmost
    /// column cannot be located; either way the page should be left alone.
    pub fn detect(&self, lines: &[&Line]) -> Result<ColumnLayout, LayoutError> {
        let opts = self.options;
        let total_lines = lines.len();
        if total_lines < opts.min_lines {
            return Err(LayoutError::InsufficientSignal {
                found: total_lines,
                required: opts.min_lines,
            });
        }

        let lefts = EdgeHistogram::from_edges(lines.iter().map(|l| l.bbox.left));
        let rights = EdgeHistogram::from_edges(lines.iter().map(|l| l.bbox.right));

        let col3 = right_column(&lefts, opts).ok_or(LayoutError::NoColumnGap {
            min_gap: opts.right_gap,
        })?;
        let col1 = left_column(&lefts, opts);
        let (col2, confidence) = match middle_column(&lefts, col1, col3, opts) {
            Some(col2) => (col2, BoundaryConfidence::Detected),
            None => (midpoint(col1, col3), BoundaryConfidence::MidpointFallback),
        };
        let boundaries = ColumnBoundaries::new(col1, col2, col3);

        #[cfg(feature = "tracing")]
        tracing::debug!(col1, col2, col3, ?confidence, total_lines, "detected columns");

        let mut buckets: [Vec<&Line>; COLUMN_COUNT] = Default::default();
        for &line in lines {
            buckets[boundaries.line_column(line.bbox.left)].push(line);
        }

        let mut short_columns = Vec::new();
        let mut samples = Vec::with_capacity(COLUMN_COUNT);
        for (column, bucket) in buckets.iter_mut().enumerate() {
            let fraction = bucket.len() as f64 / total_lines as f64;
            if fraction < opts.short_column_fraction {
                short_columns.push(ShortColumn {
                    column,
                    lines: bucket.len(),
                    fraction,
                });
            }

            bucket.sort_by_key(|l| l.bbox.top);
            samples.push(ColumnSample {
                column,
                line_count: bucket.len(),
                first: bucket.first().map(|l| l.text.clone()),
                last: bucket.last().map(|l| l.text.clone()),
            });
        }

        Ok(ColumnLayout {
            boundaries,
            confidence,
            total_lines,
            line_counts: buckets.map(|b| b.len()),
            short_columns,
            samples,
            common_left_edges: lefts.most_common(opts.top_edges),
            common_right_edges: rights.most_common(opts.top_edges),
        })
    }
}

/// Scan populated left edges from the right; the first wide gap separates
/// the rightmost column from the rest of the page.
fn right_column(lefts: &EdgeHistogram, opts: &LayoutOptions) -> Option<i32> {
    let mut last: Option<i32> = None;
    for bin in lefts.populated(1).rev() {
        if let Some(prev) = last {
            if prev.saturating_sub(bin.edge) > opts.right_gap {
                return Some(prev.saturating_sub(opts.margin));
            }
        }
        last = Some(bin.edge);
    }
    None
}

/// Smallest left edge shared by more than one line, less the margin and
/// clamped at zero. Falls back to the smallest edge overall when every edge
/// is unique.
fn left_column(lefts: &EdgeHistogram, opts: &LayoutOptions) -> i32 {
    let min = lefts.populated(1).next().map(|bin| bin.edge).or(lefts.min());
    min.map_or(0, |edge| edge.saturating_sub(opts.margin).max(0))
}

/// Mean of two boundaries, rounded toward zero.
fn midpoint(a: i32, b: i32) -> i32 {
    // the mean of two i32 values is itself in range
    ((i64::from(a) + i64::from(b)) / 2) as i32
}

/// Scan left-edge occurrences from the left, ignoring low-frequency bins.
///
/// A jump wider than `gutter_jump` means the scan has crossed the gutter
/// after column one; the first following step narrower than `cluster_jump`
/// means a cluster of aligned lines is forming, and its first edge is the
/// middle column's boundary. The candidate must lie strictly between the
/// outer boundaries.
fn middle_column(lefts: &EdgeHistogram, col1: i32, col3: i32, opts: &LayoutOptions) -> Option<i32> {
    let mut occurrences = lefts
        .populated(opts.low_frequency)
        .flat_map(|bin| iter::repeat_n(bin.edge, bin.count));
    let mut prev = occurrences.next()?;
    let mut in_gutter = false;

    for edge in occurrences {
        let step = edge.saturating_sub(prev);
        if !in_gutter {
            in_gutter = step > opts.gutter_jump;
        } else if step < opts.cluster_jump {
            let candidate = prev.saturating_sub(opts.margin);
            return (col1 < candidate && candidate < col3).then_some(candidate);
        }
        prev = edge;
    }
    None
}
