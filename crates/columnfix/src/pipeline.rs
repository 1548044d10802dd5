//! Per-page orchestration of detection, merging, and validation.

use columnfix_core::Page;

use crate::columns::ColumnDetector;
use crate::merge::BlockMerger;
use crate::options::LayoutOptions;
use crate::validate::{LayoutReport, LayoutValidator};

/// Corrects the column layout of pages one at a time.
///
/// The pipeline holds only its options, so one instance can process any
/// number of pages, from any number of threads, without one page
/// influencing another.
#[derive(Debug, Clone, Default)]
pub struct PageLayoutPipeline {
    options: LayoutOptions,
}

impl PageLayoutPipeline {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Returns the options this pipeline runs with.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Correct `page` in place and report what was done.
    ///
    /// When columns cannot be determined the page is left exactly as it
    /// was and the report's status is [`Skipped`](crate::PageStatus::Skipped).
    pub fn run(&self, page: &mut Page) -> LayoutReport {
        let validator = LayoutValidator;
        let columns = match ColumnDetector::new(&self.options).detect_page(page) {
            Ok(columns) => columns,
            Err(reason) => return validator.skipped(page.page_number, reason),
        };
        let merge = BlockMerger::new(&self.options).merge(page, &columns.boundaries);
        validator.validate(page.page_number, columns, merge)
    }

    /// Owned variant of [`run`](Self::run), returning the corrected page
    /// alongside its report.
    pub fn process(&self, mut page: Page) -> (Page, LayoutReport) {
        let report = self.run(&mut page);
        (page, report)
    }

    /// Correct every page, returning reports in page order.
    ///
    /// Runs in parallel when the `parallel` feature is enabled.
    pub fn run_batch(&self, pages: &mut [Page]) -> Vec<LayoutReport> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            pages.par_iter_mut().map(|page| self.run(page)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            pages.iter_mut().map(|page| self.run(page)).collect()
        }
    }
}
