use serde::{Deserialize, Serialize};

/// One line of the table of contents, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: Option<String>,
    pub title: String,
    pub start_page: u32,
}

impl TocEntry {
    /// The label as printed in the export, e.g. `#101: Site Survey Report`.
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("#{}: {}", id, self.title),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedToc {
    pub entries: Vec<TocEntry>,
    /// 1-based pages on which TOC lines were found.
    pub toc_pages: Vec<u32>,
}

/// Pages `[start_page, end_page)` belonging to one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub id: Option<String>,
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
}

impl PageRange {
    pub fn page_count(&self) -> u32 {
        self.end_page.saturating_sub(self.start_page)
    }

    /// Inclusive page span for display, e.g. `3–6`.
    pub fn display_pages(&self) -> String {
        format!("{}–{}", self.start_page, self.end_page.saturating_sub(1))
    }

    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => format!("#{}: {}", id, self.title),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRanges {
    pub ranges: Vec<PageRange>,
    /// Repeated or backwards TOC entries that could not be given any page.
    pub skipped: Vec<TocEntry>,
}

#[derive(Debug, Clone)]
pub struct SplitResult {
    pub source: String,
    pub title: String,
    pub filename: String,
    pub start_page: u32,
    pub end_page: u32,
    pub content: Vec<u8>,
}

impl SplitResult {
    pub fn page_count(&self) -> u32 {
        self.end_page.saturating_sub(self.start_page)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: String,
    pub source_type: SourceType,
    pub fetched_at: String,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    LocalFile,
    Url,
}

/// One uploaded document held in memory.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub bytes: Vec<u8>,
    pub metadata: DocumentMetadata,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, metadata: DocumentMetadata) -> Self {
        Self {
            name: name.into(),
            bytes,
            metadata,
        }
    }
}

/// Everything the user can configure for one batch.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub removal_patterns: Vec<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    /// Drop the `#id:` label from filenames.
    pub remove_id: bool,
    /// Custom TOC line regex; `None` uses the built-in grammar.
    pub toc_pattern: Option<String>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            removal_patterns: Vec::new(),
            prefix: None,
            suffix: None,
            remove_id: true,
            toc_pattern: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFile {
    pub filename: String,
    pub title: String,
    pub pages: String,
    pub page_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    Split {
        forms: usize,
        toc_pages: Vec<u32>,
        skipped_entries: Vec<TocEntry>,
        files: Vec<OutputFile>,
    },
    Failed {
        kind: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReport {
    pub source: String,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

impl DocumentReport {
    pub fn is_success(&self) -> bool {
        matches!(self.status, DocumentStatus::Split { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: String,
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.documents.iter().filter(|d| d.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.documents.len() - self.succeeded()
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub archive: Vec<u8>,
    pub report: BatchReport,
    pub results_count: usize,
}

/// A row of the filename preview table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewRow {
    pub source: String,
    pub form_name: String,
    pub pages: String,
    pub filename: String,
    /// True when the filename needed a numeric disambiguator.
    pub renamed: bool,
}
