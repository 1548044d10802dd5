//! Tunable thresholds for column detection and region merging.
//!
//! Every pixel value is tied to a scan resolution and column width; the
//! defaults fit a 3-column dictionary page scanned at roughly 2500x3300px.

/// Options controlling the layout pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LayoutOptions {
    /// Pages with fewer lines than this are passed through untouched. Default: 30.
    pub min_lines: usize,
    /// Tolerance (px) subtracted from detected edges and used when classifying
    /// regions, absorbing OCR jitter at column edges. Default: 10.
    pub margin: i32,
    /// Minimum gap (px) between populated left-edge bins that marks the
    /// rightmost column. Default: 200.
    pub right_gap: i32,
    /// Jump (px) between populated left edges that signals entering the
    /// gutter before the middle column. Default: 100.
    pub gutter_jump: i32,
    /// Step (px) between left edges below which a new cluster is forming.
    /// Default: 10.
    pub cluster_jump: i32,
    /// Left-edge bins with this many occurrences or fewer are ignored while
    /// locating the middle column. Default: 2.
    pub low_frequency: usize,
    /// Minimum share of lines each column should hold. Default: 0.25.
    pub short_column_fraction: f64,
    /// Maximum horizontal center distance (px) for two regions in the same
    /// column to be merged. Default: 100.
    pub merge_proximity: i32,
    /// Pages with fewer regions than this are assumed well segmented and
    /// skip merging. Default: 4.
    pub min_regions_to_merge: usize,
    /// Number of most common line edges kept in the report. Default: 20.
    pub top_edges: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            min_lines: 30,
            margin: 10,
            right_gap: 200,
            gutter_jump: 100,
            cluster_jump: 10,
            low_frequency: 2,
            short_column_fraction: 0.25,
            merge_proximity: 100,
            min_regions_to_merge: 4,
            top_edges: 20,
        }
    }
}

impl LayoutOptions {
    /// Options with the tight 100px merge proximity.
    ///
    /// Only fragments whose centers nearly coincide are merged.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Options with the loose 450px merge proximity.
    ///
    /// Merges fragments of a column even when one is much narrower than the
    /// other (e.g. a short last paragraph), at the risk of joining regions
    /// from adjacent columns on pages with narrow columns.
    pub fn tolerant() -> Self {
        Self {
            merge_proximity: 450,
            ..Self::default()
        }
    }
}
