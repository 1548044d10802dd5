//! Column assignment and merging of fragmented text regions.
//!
//! Merging runs in two phases. [`plan_merge`] classifies an immutable
//! snapshot of the page's regions and decides which fragments join which,
//! then [`apply_merge`] consumes the region list once and rebuilds it. No
//! region is detached while the list is being scanned.

use columnfix_core::{BBox, ColumnAssignment, Page, TextRegion};

use crate::columns::{COLUMN_COUNT, ColumnBoundaries};
use crate::options::LayoutOptions;

/// A merge target and the fragments it absorbs, by index into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeGroup {
    pub column: usize,
    pub target: usize,
    /// Absorbed regions, in top-to-bottom order.
    pub absorbed: Vec<usize>,
}

/// Decisions computed over a snapshot of a page's regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Regions left of the first column, in document order.
    pub removed: Vec<usize>,
    /// Surviving regions in column order, top to bottom within a column.
    pub groups: Vec<MergeGroup>,
}

impl MergePlan {
    /// Number of regions that will be absorbed into another.
    pub fn absorbed_count(&self) -> usize {
        self.groups.iter().map(|g| g.absorbed.len()).sum()
    }
}

/// Regions produced by [`apply_merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub surviving: Vec<TextRegion>,
    pub removed: Vec<TextRegion>,
}

/// Two surviving regions whose boxes touch, overlap, or nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionOverlap {
    pub first: BBox,
    pub second: BBox,
    /// One box lies completely inside the other.
    pub nested: bool,
}

/// What the merger did to one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeReport {
    /// Too few regions to merge; the region list was left as is.
    pub skipped: bool,
    pub regions_before: usize,
    pub regions_after: usize,
    /// Regions absorbed into a merge target.
    pub absorbed: usize,
    /// Boxes of regions removed as left-margin noise.
    pub removed_margin: Vec<BBox>,
    /// Union of the surviving region boxes.
    pub page_bbox: Option<BBox>,
    /// Every surviving box, present only when the region count is not
    /// [`COLUMN_COUNT`].
    pub region_count_mismatch: Option<Vec<BBox>>,
    pub overlaps: Vec<RegionOverlap>,
}

/// Classify regions by column and decide which fragments merge.
///
/// Within each column, regions are walked top to bottom. A region whose
/// horizontal center lies within `merge_proximity` of the current target's
/// center is absorbed by it; otherwise it becomes the new target. The
/// target's center is taken from its own box and does not move as it grows.
pub fn plan_merge(
    regions: &[TextRegion],
    boundaries: &ColumnBoundaries,
    options: &LayoutOptions,
) -> MergePlan {
    let mut removed = Vec::new();
    let mut by_column: Vec<Vec<usize>> = vec![Vec::new(); COLUMN_COUNT];

    for (i, region) in regions.iter().enumerate() {
        match region
            .bbox
            .column_index(boundaries.as_slice(), options.margin)
        {
            ColumnAssignment::LeftMargin => removed.push(i),
            ColumnAssignment::Column(c) => by_column[c.min(COLUMN_COUNT - 1)].push(i),
        }
    }

    let mut groups: Vec<MergeGroup> = Vec::new();
    for (column, mut members) in by_column.into_iter().enumerate() {
        members.sort_by_key(|&i| regions[i].bbox.top);

        // (index into `groups`, center of its target)
        let mut current: Option<(usize, i32)> = None;
        for i in members {
            let center = regions[i].bbox.center_x();
            match current {
                Some((g, target_center))
                    if i64::from(center.abs_diff(target_center))
                        < i64::from(options.merge_proximity) =>
                {
                    groups[g].absorbed.push(i);
                }
                _ => {
                    groups.push(MergeGroup {
                        column,
                        target: i,
                        absorbed: Vec::new(),
                    });
                    current = Some((groups.len() - 1, center));
                }
            }
        }
    }

    MergePlan { removed, groups }
}

/// Rebuild the region list according to `plan`.
///
/// Absorbed regions hand their children to the target in top-to-bottom
/// order and the target box grows to cover them. Indices not present in
/// `regions` are ignored.
pub fn apply_merge(regions: Vec<TextRegion>, plan: &MergePlan) -> MergeOutcome {
    let mut slots: Vec<Option<TextRegion>> = regions.into_iter().map(Some).collect();
    let mut take = |i: usize| slots.get_mut(i).and_then(Option::take);

    let removed = plan.removed.iter().filter_map(|&i| take(i)).collect();

    let mut surviving = Vec::with_capacity(plan.groups.len());
    for group in &plan.groups {
        let Some(mut target) = take(group.target) else {
            continue;
        };
        for &i in &group.absorbed {
            if let Some(fragment) = take(i) {
                target.absorb(fragment);
            }
        }
        surviving.push(target);
    }

    MergeOutcome { surviving, removed }
}

/// Pairs of regions whose boxes intersect, flagging nested pairs.
pub fn find_overlaps(regions: &[TextRegion]) -> Vec<RegionOverlap> {
    let mut overlaps = Vec::new();
    for (i, a) in regions.iter().enumerate() {
        for b in &regions[i + 1..] {
            if a.bbox.intersects(&b.bbox) {
                overlaps.push(RegionOverlap {
                    first: a.bbox,
                    second: b.bbox,
                    nested: a.bbox.innermost_of(&b.bbox).is_some(),
                });
            }
        }
    }
    overlaps
}

/// Assigns a page's regions to columns and merges same-column fragments.
#[derive(Debug, Clone, Copy)]
pub struct BlockMerger<'a> {
    options: &'a LayoutOptions,
}

impl<'a> BlockMerger<'a> {
    pub fn new(options: &'a LayoutOptions) -> Self {
        Self { options }
    }

    /// Merge the top-level regions of `page` in place.
    ///
    /// Pages with fewer than `min_regions_to_merge` regions are assumed to be
    /// well segmented and keep their regions untouched; the postcondition
    /// checks still run.
    pub fn merge(&self, page: &mut Page, boundaries: &ColumnBoundaries) -> MergeReport {
        let regions_before = page.regions.len();
        let skipped = regions_before < self.options.min_regions_to_merge;
        let mut removed_margin = Vec::new();
        let mut absorbed = 0;

        if !skipped {
            let plan = plan_merge(&page.regions, boundaries, self.options);
            absorbed = plan.absorbed_count();
            let outcome = apply_merge(std::mem::take(&mut page.regions), &plan);
            removed_margin = outcome.removed.iter().map(|r| r.bbox).collect();
            page.regions = outcome.surviving;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                page = ?page.page_number,
                before = regions_before,
                after = page.regions.len(),
                absorbed,
                removed = removed_margin.len(),
                "merged regions"
            );
        }

        let regions_after = page.regions.len();
        let region_count_mismatch = (regions_after != COLUMN_COUNT)
            .then(|| page.regions.iter().map(|r| r.bbox).collect());

        MergeReport {
            skipped,
            regions_before,
            regions_after,
            absorbed,
            removed_margin,
            page_bbox: page.bbox(),
            region_count_mismatch,
            overlaps: find_overlaps(&page.regions),
        }
    }
}
