use std::fmt;
use std::str::FromStr;

use crate::error::LayoutError;

/// Bounding box in page-pixel space with a top-left origin.
///
/// Coordinates follow the OCR engine's convention:
/// - `left`: left edge
/// - `top`: top edge (distance from top of page)
/// - `right`: right edge
/// - `bottom`: bottom edge (distance from top of page)
///
/// Boxes serialize to and from the four whitespace-separated integers
/// `"left top right bottom"` via [`Display`](fmt::Display) and [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Column a region was classified into by [`BBox::column_index`].
///
/// Ordered so that `LeftMargin` sorts before every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnAssignment {
    /// Entirely left of the first column: margin noise.
    LeftMargin,
    /// Zero-based column index.
    Column(usize),
}

impl ColumnAssignment {
    /// Returns the column index, or `None` for margin noise.
    pub fn column(self) -> Option<usize> {
        match self {
            ColumnAssignment::LeftMargin => None,
            ColumnAssignment::Column(i) => Some(i),
        }
    }
}

impl BBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        debug_assert!(left <= right && top <= bottom, "inverted bbox");
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a box, rejecting inverted edges.
    pub fn try_new(left: i32, top: i32, right: i32, bottom: i32) -> Result<Self, LayoutError> {
        if left > right || top > bottom {
            return Err(LayoutError::MalformedBoundingBox {
                input: format!("{left} {top} {right} {bottom}"),
                reason: "edges are inverted".to_string(),
            });
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Width of the bounding box, saturating at `i32::MAX`.
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// Height of the bounding box, saturating at `i32::MAX`.
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Horizontal center, rounded toward the left edge.
    pub fn center_x(&self) -> i32 {
        let (left, right) = (i64::from(self.left), i64::from(self.right));
        // lies between left and right, so always fits
        (left + (right - left) / 2) as i32
    }

    /// Returns true if `other` lies entirely within `self` on all four edges.
    pub fn contains(&self, other: &BBox) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Returns true if the boxes share any point. Touching edges count.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// Returns whichever box is completely nested inside the other.
    ///
    /// When the boxes are equal, `other` is returned.
    pub fn innermost_of(&self, other: &BBox) -> Option<BBox> {
        if self.contains(other) {
            Some(*other)
        } else if other.contains(self) {
            Some(*self)
        } else {
            None
        }
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Grow `self` in place to cover `other`.
    pub fn expand_to_cover(&mut self, other: &BBox) {
        *self = self.union(other);
    }

    /// Classify this box against ascending column left boundaries.
    ///
    /// A box whose right edge lies left of the first boundary is margin
    /// noise. Otherwise the box belongs to the first column `i` whose
    /// successor boundary, less `margin`, lies right of the box's left edge;
    /// boxes past every boundary land in the last column.
    ///
    /// `boundaries` must be non-empty; an empty slice classifies every box
    /// into column 0.
    pub fn column_index(&self, boundaries: &[i32], margin: i32) -> ColumnAssignment {
        let Some(&first) = boundaries.first() else {
            return ColumnAssignment::Column(0);
        };
        if self.right < first {
            return ColumnAssignment::LeftMargin;
        }
        for (i, &next) in boundaries.iter().enumerate().skip(1) {
            if self.left < next.saturating_sub(margin) {
                return ColumnAssignment::Column(i - 1);
            }
        }
        ColumnAssignment::Column(boundaries.len() - 1)
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.left, self.top, self.right, self.bottom)
    }
}

impl FromStr for BBox {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| LayoutError::MalformedBoundingBox {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(malformed(&format!(
                "expected 4 integers, found {} fields",
                fields.len()
            )));
        }

        let mut coords = [0i32; 4];
        for (slot, field) in coords.iter_mut().zip(&fields) {
            *slot = field
                .parse()
                .map_err(|_| malformed(&format!("{field:?} is not an integer")))?;
        }

        let [left, top, right, bottom] = coords;
        if left > right || top > bottom {
            return Err(malformed("edges are inverted"));
        }
        Ok(BBox {
            left,
            top,
            right,
            bottom,
        })
    }
}
