//! # Form Splitter Library
//!
//! Splits "ACC Build Form detail" PDF exports into one PDF per form, using the
//! table of contents printed inside the export (`#101: Site Survey Report .... 3`).
//! Output filenames are cleaned with removal patterns, templated with an
//! optional prefix/suffix, made unique, and packaged into one zip archive.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use form_splitter::{process_batch, ContentFetcher, SplitConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document = ContentFetcher::fetch_document("export.pdf").await?;
//!
//!     let config = SplitConfig {
//!         removal_patterns: vec![r"\d{3}".to_string()],
//!         prefix: None,
//!         suffix: Some("_signed".to_string()),
//!         remove_id: true,
//!         toc_pattern: None,
//!     };
//!
//!     let outcome = process_batch(&[document], &config)?;
//!     std::fs::write("forms.zip", &outcome.archive)?;
//!
//!     println!("Archived {} forms", outcome.results_count);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export main types and services for easier usage
pub use error::{FormSplitterError, Result};
pub use services::{
    process_batch, ArchivePackager, BatchProcessor, ContentFetcher, DocumentSplitter,
    FilenameBuilder, NameRegistry, PdfSource, RangeResolver, TocParser,
};
pub use types::{
    BatchOutcome, BatchReport, DocumentMetadata, DocumentReport, DocumentStatus, PageRange,
    PreviewRow, SourceDocument, SourceType, SplitConfig, SplitResult, TocEntry,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
