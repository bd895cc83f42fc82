use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormSplitterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("HTTP status error: {status}")]
    HttpStatus { status: u16 },

    #[error("Unreadable PDF: {reason}")]
    UnreadablePdf { reason: String },

    #[error("No table of contents found in document")]
    NoTocFound,

    #[error("Table of contents has no entries")]
    EmptyToc,

    #[error("Page range {start}-{end} is out of bounds (document has {total} pages)")]
    PageRangeOutOfBounds { start: u32, end: u32, total: u32 },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Output file error: {reason}")]
    OutputFile { reason: String },

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl FormSplitterError {
    /// Stable name used in per-document reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "IoError",
            Self::Http(_) => "HttpError",
            Self::InvalidUrl(_) => "InvalidUrlError",
            Self::FileNotFound { .. } => "FileNotFoundError",
            Self::HttpStatus { .. } => "HttpStatusError",
            Self::UnreadablePdf { .. } => "UnreadablePdfError",
            Self::NoTocFound => "NoTocFoundError",
            Self::EmptyToc => "EmptyTocError",
            Self::PageRangeOutOfBounds { .. } => "PageRangeOutOfBoundsError",
            Self::InvalidPattern { .. } => "InvalidPatternError",
            Self::Archive(_) => "ArchiveError",
            Self::OutputFile { .. } => "OutputFileError",
            Self::Anyhow(_) => "InternalError",
        }
    }

    /// Errors that belong to a single document and must not stop a batch.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            Self::UnreadablePdf { .. }
                | Self::NoTocFound
                | Self::EmptyToc
                | Self::PageRangeOutOfBounds { .. }
                | Self::OutputFile { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FormSplitterError>;
