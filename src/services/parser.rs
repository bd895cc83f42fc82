use crate::error::{FormSplitterError, Result};
use crate::types::{ParsedToc, TocEntry};
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info};

/// `#1234: Title ........ 56` (or `#FRM-12: ...`) with any run of whitespace, dots, ellipses,
/// middle dots, underscores or dashes between title and page number.
const DEFAULT_TOC_PATTERN: &str =
    r"^\s*#\s*(?P<id>[\w\-]+)\s*[:.\-]\s*(?P<title>.+?)[\s.·…_\-]+(?P<page>\d+)\s*$";

const TITLE_FILLER: &[char] = &['.', '·', '…', '_', '-', ' ', '\t'];

pub struct TocParser {
    line_pattern: Regex,
    page_number_pattern: Regex,
    has_page_group: bool,
    has_id_group: bool,
}

impl TocParser {
    /// A custom regex must name a `title` group; `id` and `page` groups are
    /// optional. Without `page` the rightmost integer on the line is used.
    pub fn new(custom_line_pattern: Option<&str>) -> Result<Self> {
        let source = custom_line_pattern.unwrap_or(DEFAULT_TOC_PATTERN);

        let line_pattern = Regex::new(source).map_err(|e| FormSplitterError::InvalidPattern {
            pattern: source.to_string(),
            reason: format!("Invalid TOC line regex: {}", e),
        })?;

        let names: Vec<&str> = line_pattern.capture_names().flatten().collect();
        if !names.contains(&"title") {
            return Err(FormSplitterError::InvalidPattern {
                pattern: source.to_string(),
                reason: "TOC line regex must define a named 'title' group".to_string(),
            });
        }

        let page_number_pattern = Regex::new(r"\d+").map_err(|e| FormSplitterError::InvalidPattern {
            pattern: r"\d+".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            has_page_group: names.contains(&"page"),
            has_id_group: names.contains(&"id"),
            line_pattern,
            page_number_pattern,
        })
    }

    pub fn parse(&self, source_name: &str, page_texts: &[String]) -> Result<ParsedToc> {
        info!("Scanning {} pages of '{}' for TOC lines", page_texts.len(), source_name);

        let mut entries = Vec::new();
        let mut toc_pages = Vec::new();

        for (page_idx, text) in page_texts.iter().enumerate() {
            let page_number = page_idx as u32 + 1;
            let before = entries.len();

            for line in text.lines() {
                if let Some(entry) = self.parse_line(line) {
                    debug!(
                        "Page {}: TOC entry '{}' starts at page {}",
                        page_number, entry.title, entry.start_page
                    );
                    entries.push(entry);
                }
            }

            if entries.len() > before {
                toc_pages.push(page_number);
            }
        }

        if entries.is_empty() {
            return Err(FormSplitterError::NoTocFound);
        }

        info!(
            "Found {} TOC entries on page(s) {:?} of '{}'",
            entries.len(),
            toc_pages,
            source_name
        );

        Ok(ParsedToc { entries, toc_pages })
    }

    pub fn parse_line(&self, line: &str) -> Option<TocEntry> {
        let line = line.trim_end_matches('\r');
        let captures = self.line_pattern.captures(line)?;

        let title = captures
            .name("title")?
            .as_str()
            .trim_matches(TITLE_FILLER)
            .to_string();
        if title.is_empty() {
            return None;
        }

        let page_text = if self.has_page_group {
            captures.name("page")?.as_str()
        } else {
            self.page_number_pattern.find_iter(line).last()?.as_str()
        };
        let start_page = page_text.parse::<u32>().ok()?;

        let id = if self.has_id_group {
            captures.name("id").map(|m| m.as_str().to_string())
        } else {
            None
        };

        Some(TocEntry {
            id,
            title,
            start_page,
        })
    }

    pub fn get_parsing_stats(&self, toc: &ParsedToc) -> HashMap<String, serde_json::Value> {
        let mut stats = HashMap::new();

        stats.insert("entries".to_string(), toc.entries.len().into());
        stats.insert("toc_pages".to_string(), toc.toc_pages.clone().into());

        let mut seen = std::collections::HashSet::new();
        let duplicate_titles = toc
            .entries
            .iter()
            .filter(|e| !seen.insert(e.title.as_str()))
            .count();
        stats.insert("duplicate_titles".to_string(), duplicate_titles.into());

        if let Some(first) = toc.entries.first() {
            stats.insert("first_start_page".to_string(), first.start_page.into());
        }

        stats
    }
}

impl Default for TocParser {
    fn default() -> Self {
        Self::new(None).expect("built-in TOC pattern compiles")
    }
}
