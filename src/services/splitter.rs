use crate::error::{FormSplitterError, Result};
use crate::services::extractor::PdfSource;
use crate::services::namer::{FilenameBuilder, NameRegistry};
use crate::types::{PageRange, SplitResult};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct PlannedSplit {
    pub range: PageRange,
    pub filename: String,
    pub renamed: bool,
}

pub struct DocumentSplitter;

impl DocumentSplitter {
    /// Cut one PDF per range. Filenames are claimed in `registry` only when
    /// the whole document splits successfully.
    pub fn split_document(
        source: &PdfSource,
        ranges: &[PageRange],
        namer: &FilenameBuilder,
        registry: &mut NameRegistry,
    ) -> Result<Vec<SplitResult>> {
        info!("Splitting '{}' into {} forms", source.name(), ranges.len());

        Self::validate_ranges(ranges, source.page_count())?;

        let mut staged = registry.clone();
        let plan = Self::plan_filenames(ranges, namer, &mut staged);
        let mut results = Vec::with_capacity(plan.len());

        for planned in plan {
            let range = planned.range;
            let content = source.extract_pages(range.start_page, range.end_page)?;

            debug!(
                "Created '{}' with {} pages (pages {})",
                planned.filename,
                range.page_count(),
                range.display_pages()
            );

            results.push(SplitResult {
                source: source.name().to_string(),
                title: range.title,
                filename: planned.filename,
                start_page: range.start_page,
                end_page: range.end_page,
                content,
            });
        }

        *registry = staged;

        info!(
            "Split '{}' into {} files",
            source.name(),
            results.len()
        );

        Ok(results)
    }

    pub fn plan_filenames(
        ranges: &[PageRange],
        namer: &FilenameBuilder,
        registry: &mut NameRegistry,
    ) -> Vec<PlannedSplit> {
        ranges
            .iter()
            .map(|range| {
                let stem = namer.base_name(range);
                let (filename, renamed) = registry.claim(&stem);
                PlannedSplit {
                    range: range.clone(),
                    filename,
                    renamed,
                }
            })
            .collect()
    }

    fn validate_ranges(ranges: &[PageRange], total_pages: u32) -> Result<()> {
        if ranges.is_empty() {
            return Err(FormSplitterError::EmptyToc);
        }

        for range in ranges {
            if range.start_page == 0
                || range.start_page > total_pages
                || range.end_page > total_pages + 1
                || range.end_page <= range.start_page
            {
                return Err(FormSplitterError::PageRangeOutOfBounds {
                    start: range.start_page,
                    end: range.end_page,
                    total: total_pages,
                });
            }
        }

        Ok(())
    }
}
