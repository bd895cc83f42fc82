use crate::error::{FormSplitterError, Result};
use crate::types::{PageRange, ResolvedRanges, TocEntry};
use tracing::{debug, warn};

pub struct RangeResolver;

impl RangeResolver {
    /// Turn ordered TOC entries into contiguous `[start, end)` page ranges.
    ///
    /// An entry that repeats the previous entry's page falls through to the
    /// page after it. An entry that points back before the previous entry's
    /// page cannot own any page without taking another form's pages, so it is
    /// returned in `skipped`, as is a repeat that would run past the end.
    pub fn resolve(entries: &[TocEntry], total_pages: u32) -> Result<ResolvedRanges> {
        if entries.is_empty() {
            return Err(FormSplitterError::EmptyToc);
        }

        let mut starts: Vec<(&TocEntry, u32)> = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for entry in entries {
            let previous = starts.last().map(|(prev, start)| (prev.start_page, *start));

            let start = match previous {
                Some((listed, _)) if entry.start_page < listed => {
                    warn!(
                        "Skipping TOC entry '{}': page {} comes before the previous entry's page {}",
                        entry.title, entry.start_page, listed
                    );
                    skipped.push(entry.clone());
                    continue;
                }
                Some((_, prev)) if entry.start_page <= prev => {
                    let fallthrough = prev + 1;
                    if fallthrough > total_pages {
                        warn!(
                            "Skipping duplicate TOC entry '{}' (page {}): no pages left",
                            entry.title, entry.start_page
                        );
                        skipped.push(entry.clone());
                        continue;
                    }
                    debug!(
                        "TOC entry '{}' repeats page {}, starting at page {}",
                        entry.title, entry.start_page, fallthrough
                    );
                    fallthrough
                }
                _ => {
                    if entry.start_page == 0 || entry.start_page > total_pages {
                        return Err(FormSplitterError::PageRangeOutOfBounds {
                            start: entry.start_page,
                            end: total_pages + 1,
                            total: total_pages,
                        });
                    }
                    entry.start_page
                }
            };

            starts.push((entry, start));
        }

        let ranges = starts
            .iter()
            .enumerate()
            .map(|(idx, (entry, start))| {
                let end_page = starts
                    .get(idx + 1)
                    .map(|(_, next)| *next)
                    .unwrap_or(total_pages + 1);

                PageRange {
                    id: entry.id.clone(),
                    title: entry.title.clone(),
                    start_page: *start,
                    end_page,
                }
            })
            .collect();

        Ok(ResolvedRanges { ranges, skipped })
    }
}
