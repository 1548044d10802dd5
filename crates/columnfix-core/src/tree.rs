//! The OCR page tree consumed and corrected by the layout pipeline.
//!
//! A [`Page`] owns top-level [`TextRegion`]s; each region owns an ordered
//! list of [`RegionChild`]ren, either [`Line`]s or nested regions.

use crate::geometry::BBox;

/// A positioned line of recognized text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// Bounding box of this line.
    pub bbox: BBox,
    /// Recognized text content.
    pub text: String,
}

impl Line {
    pub fn new(bbox: BBox, text: impl Into<String>) -> Self {
        Self {
            bbox,
            text: text.into(),
        }
    }
}

/// A child node of a [`TextRegion`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegionChild {
    Line(Line),
    Region(TextRegion),
}

impl RegionChild {
    /// Bounding box of the child, whichever kind it is.
    pub fn bbox(&self) -> BBox {
        match self {
            RegionChild::Line(line) => line.bbox,
            RegionChild::Region(region) => region.bbox,
        }
    }
}

/// A segmented block of text (an OCR "carea").
///
/// A region is *clean* when its box equals the union of the boxes of every
/// line it contains. Merging grows the target box with
/// [`BBox::expand_to_cover`], so a merged region is clean when its inputs
/// were; [`TextRegion::recompute_bbox`] restores the invariant otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRegion {
    /// Bounding box of this region.
    pub bbox: BBox,
    /// Lines and nested regions, in document order.
    pub children: Vec<RegionChild>,
}

impl TextRegion {
    pub fn new(bbox: BBox, children: Vec<RegionChild>) -> Self {
        Self { bbox, children }
    }

    /// Build a clean region from lines, computing its box as their union.
    ///
    /// Returns `None` when `lines` is empty.
    pub fn from_lines(lines: Vec<Line>) -> Option<Self> {
        let bbox = union_all(lines.iter().map(|l| l.bbox))?;
        Some(Self {
            bbox,
            children: lines.into_iter().map(RegionChild::Line).collect(),
        })
    }

    /// Iterate over every line in this region, depth-first in document order.
    pub fn lines(&self) -> Lines<'_> {
        Lines {
            stack: vec![self.children.iter()],
        }
    }

    /// Number of lines in this region, including nested regions.
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Union of all contained line boxes, or `None` for an empty region.
    pub fn lines_bbox(&self) -> Option<BBox> {
        union_all(self.lines().map(|l| l.bbox))
    }

    /// Returns true if the region box equals the union of its line boxes.
    ///
    /// Regions without lines are considered clean.
    pub fn is_clean(&self) -> bool {
        self.lines_bbox().is_none_or(|b| b == self.bbox)
    }

    /// Reset the region box to the union of its line boxes.
    ///
    /// Leaves the box untouched when the region has no lines.
    pub fn recompute_bbox(&mut self) {
        if let Some(bbox) = self.lines_bbox() {
            self.bbox = bbox;
        }
    }

    /// Move every child of `other` to the end of this region and grow the
    /// box to cover it.
    pub fn absorb(&mut self, other: TextRegion) {
        self.bbox.expand_to_cover(&other.bbox);
        self.children.extend(other.children);
    }
}

/// Depth-first iterator over the lines of a region or page.
pub struct Lines<'a> {
    stack: Vec<std::slice::Iter<'a, RegionChild>>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<&'a Line> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(RegionChild::Line(line)) => return Some(line),
                Some(RegionChild::Region(region)) => self.stack.push(region.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// One scanned page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    /// Page number within the source volume, if the caller tracks one.
    pub page_number: Option<usize>,
    /// Top-level text regions, in document order.
    pub regions: Vec<TextRegion>,
}

impl Page {
    pub fn new(regions: Vec<TextRegion>) -> Self {
        Self {
            page_number: None,
            regions,
        }
    }

    /// Set the page number, returning the modified page.
    pub fn with_page_number(mut self, page_number: usize) -> Self {
        self.page_number = Some(page_number);
        self
    }

    /// Iterate over every line on the page, depth-first in document order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.regions.iter().flat_map(TextRegion::lines)
    }

    /// Union of all top-level region boxes, or `None` for an empty page.
    pub fn bbox(&self) -> Option<BBox> {
        union_all(self.regions.iter().map(|r| r.bbox))
    }
}

/// Union of a sequence of boxes, or `None` if it is empty.
pub fn union_all(boxes: impl IntoIterator<Item = BBox>) -> Option<BBox> {
    boxes.into_iter().reduce(|acc, b| acc.union(&b))
}
