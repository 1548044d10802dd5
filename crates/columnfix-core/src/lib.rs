//! columnfix-core: data types shared by the columnfix layout pipeline.
//!
//! This crate provides the integer [`BBox`] and its predicates, the OCR page
//! tree ([`Page`], [`TextRegion`], [`Line`]), the hOCR `title` codec, and the
//! error and warning types. It performs no I/O.

pub mod error;
pub mod geometry;
pub mod hocr;
pub mod tree;

pub use error::{LayoutError, LayoutWarning, LayoutWarningCode};
pub use geometry::{BBox, ColumnAssignment};
pub use hocr::HocrTitle;
pub use tree::{Line, Lines, Page, RegionChild, TextRegion, union_all};
