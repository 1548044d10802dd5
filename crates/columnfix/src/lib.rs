//! columnfix: reconstruct the three-column layout of a scanned page from
//! fragmented OCR regions.
//!
//! OCR page segmentation routinely splits a column into several regions,
//! misses column boundaries, and picks up specks in the margin. Given one
//! page tree, this crate
//!
//! 1. infers the three column left boundaries from line edge statistics
//!    ([`ColumnDetector`]),
//! 2. assigns regions to columns, drops left-margin noise, and merges
//!    vertically stacked fragments of the same column ([`BlockMerger`]),
//! 3. checks the result and collects every anomaly ([`LayoutValidator`]).
//!
//! [`PageLayoutPipeline`] runs all three for one page and returns a
//! [`LayoutReport`]. Pages share no state.
//!
//! # Example
//!
//! ```
//! use columnfix::{LayoutOptions, Page, PageLayoutPipeline};
//!
//! let pipeline = PageLayoutPipeline::new(LayoutOptions::default());
//! let mut page = Page::default();
//! let report = pipeline.run(&mut page);
//! assert!(report.is_skipped());
//! ```
//!
//! # Features
//!
//! - `tracing` (default): emit `tracing` events for detected boundaries,
//!   merge decisions, and warnings.
//! - `serde`: derive `Serialize`/`Deserialize` for options, reports, and the
//!   page tree.
//! - `parallel`: process batches of pages with rayon in
//!   [`PageLayoutPipeline::run_batch`].

pub mod columns;
pub mod histogram;
pub mod merge;
pub mod options;
pub mod pipeline;
pub mod validate;

pub use columnfix_core;

pub use columnfix_core::{
    BBox, ColumnAssignment, HocrTitle, LayoutError, LayoutWarning, LayoutWarningCode, Line, Page,
    RegionChild, TextRegion,
};
pub use columns::{
    BoundaryConfidence, COLUMN_COUNT, ColumnBoundaries, ColumnDetector, ColumnLayout,
    ColumnSample, ShortColumn,
};
pub use histogram::{EdgeCount, EdgeHistogram};
pub use merge::{
    BlockMerger, MergeGroup, MergeOutcome, MergePlan, MergeReport, RegionOverlap, apply_merge,
    find_overlaps, plan_merge,
};
pub use options::LayoutOptions;
pub use pipeline::PageLayoutPipeline;
pub use validate::{LayoutReport, LayoutValidator, PageStatus};
