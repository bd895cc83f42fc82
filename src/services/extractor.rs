use crate::error::{FormSplitterError, Result};
use lopdf::Document;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

pub struct PdfSource {
    name: String,
    bytes: Vec<u8>,
    document: Document,
    page_count: u32,
}

impl PdfSource {
    pub fn load(name: &str, bytes: &[u8]) -> Result<Self> {
        let document = Document::load_mem(bytes).map_err(|e| FormSplitterError::UnreadablePdf {
            reason: format!("{}: {}", name, e),
        })?;

        if document.is_encrypted() {
            return Err(FormSplitterError::UnreadablePdf {
                reason: format!("{} is encrypted", name),
            });
        }

        let page_count = document.get_pages().len() as u32;
        if page_count == 0 {
            return Err(FormSplitterError::UnreadablePdf {
                reason: format!("{} has no pages", name),
            });
        }

        debug!("Loaded '{}' with {} pages", name, page_count);

        Ok(Self {
            name: name.to_string(),
            bytes: bytes.to_vec(),
            document,
            page_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Text of every page, in page order. Fails when no page has any text.
    pub fn page_texts(&self) -> Result<Vec<String>> {
        // Positional layout keeps the gap between a title and its page number
        let texts = match self.layout_texts() {
            Ok(texts) if texts.len() == self.page_count as usize => texts,
            Ok(texts) => {
                warn!(
                    "Layout extraction of '{}' returned {} of {} pages, using plain text",
                    self.name,
                    texts.len(),
                    self.page_count
                );
                self.plain_texts()
            }
            Err(reason) => {
                warn!(
                    "Layout extraction of '{}' failed ({}), using plain text",
                    self.name, reason
                );
                self.plain_texts()
            }
        };

        if texts.iter().all(|t| t.trim().is_empty()) {
            return Err(FormSplitterError::UnreadablePdf {
                reason: format!("{} has no extractable text layer", self.name),
            });
        }

        Ok(texts)
    }

    fn layout_texts(&self) -> std::result::Result<Vec<String>, String> {
        // pdf-extract panics on some malformed fonts
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&self.bytes)
        }));

        match result {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err("extractor panicked".to_string()),
        }
    }

    fn plain_texts(&self) -> Vec<String> {
        (1..=self.page_count)
            .map(|page_number| {
                self.document
                    .extract_text(&[page_number])
                    .unwrap_or_else(|e| {
                        warn!(
                            "Could not extract text from page {} of '{}': {}",
                            page_number, self.name, e
                        );
                        String::new()
                    })
            })
            .collect()
    }

    pub fn extract_pages(&self, start_page: u32, end_page: u32) -> Result<Vec<u8>> {
        if start_page == 0
            || start_page > self.page_count
            || end_page > self.page_count + 1
            || end_page <= start_page
        {
            return Err(FormSplitterError::PageRangeOutOfBounds {
                start: start_page,
                end: end_page,
                total: self.page_count,
            });
        }

        let mut slice = self.document.clone();
        let to_delete: Vec<u32> = (1..start_page)
            .chain(end_page..=self.page_count)
            .collect();

        if !to_delete.is_empty() {
            slice.delete_pages(&to_delete);
        }
        slice.prune_objects();
        slice.compress();

        let mut buffer = Vec::new();
        slice
            .save_to(&mut buffer)
            .map_err(|e| FormSplitterError::OutputFile {
                reason: format!(
                    "Failed to write pages {}-{} of '{}': {}",
                    start_page,
                    end_page - 1,
                    self.name,
                    e
                ),
            })?;

        Ok(buffer)
    }
}

pub fn extract_page_texts(name: &str, bytes: &[u8]) -> Result<Vec<String>> {
    PdfSource::load(name, bytes)?.page_texts()
}
