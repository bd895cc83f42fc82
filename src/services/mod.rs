pub mod archive;
pub mod extractor;
pub mod fetcher;
pub mod namer;
pub mod parser;
pub mod pipeline;
pub mod resolver;
pub mod splitter;

pub use archive::ArchivePackager;
pub use extractor::{extract_page_texts, PdfSource};
pub use fetcher::ContentFetcher;
pub use namer::{sanitize, split_pattern_list, FilenameBuilder, NameRegistry, RemovalPattern};
pub use parser::TocParser;
pub use pipeline::{process_batch, AnalyzedDocument, BatchProcessor};
pub use resolver::RangeResolver;
pub use splitter::{DocumentSplitter, PlannedSplit};
