use crate::error::{FormSplitterError, Result};
use crate::types::{PageRange, SplitConfig};
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::debug;

const REGEX_METACHARACTERS: &[char] = &[
    '\\', '.', '+', '?', '(', ')', '[', ']', '{', '}', '|', '^', '$',
];
const SEPARATOR: char = '_';
const EXTENSION: &str = ".pdf";
const FALLBACK_NAME: &str = "form";

#[derive(Debug, Clone)]
pub struct RemovalPattern {
    source: String,
    regex: Regex,
}

impl RemovalPattern {
    pub fn compile(pattern: &str) -> Result<Self> {
        let expression = if Self::is_wildcard(pattern) {
            pattern
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*")
        } else {
            pattern.to_string()
        };

        let regex = RegexBuilder::new(&expression)
            .case_insensitive(true)
            .build()
            .map_err(|e| FormSplitterError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// `Draft*`, `* copy`: a `*` and no other regex syntax.
    pub fn is_wildcard(pattern: &str) -> bool {
        pattern.contains('*') && !pattern.contains(REGEX_METACHARACTERS)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn remove_from(&self, text: &str) -> String {
        self.regex.replace_all(text, "").into_owned()
    }
}

/// Split a comma-separated pattern list. Commas inside `{m,n}` or written
/// as `\,` stay part of the pattern.
pub fn split_pattern_list(input: &str) -> Vec<String> {
    let mut patterns = Vec::new();
    let mut current = String::new();
    let mut brace_depth = 0usize;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(',') => current.push(','),
                Some(next) => {
                    current.push('\\');
                    current.push(next);
                }
                None => current.push('\\'),
            },
            '{' => {
                brace_depth += 1;
                current.push(c);
            }
            '}' => {
                brace_depth = brace_depth.saturating_sub(1);
                current.push(c);
            }
            ',' if brace_depth == 0 => {
                patterns.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    patterns.push(current);

    patterns
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Replace unsafe characters with `_`, collapse runs, trim the ends.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for c in name.chars() {
        let c = if c.is_alphanumeric() || c == '-' || c == '.' || c == SEPARATOR {
            c
        } else {
            SEPARATOR
        };
        if c == SEPARATOR && out.ends_with(SEPARATOR) {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches(|c| c == SEPARATOR || c == '.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn strip_extension(name: &str) -> &str {
    let cut = name.len().saturating_sub(EXTENSION.len());
    match name.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(EXTENSION) && cut > 0 => {
            name[..cut].trim_end_matches(|c| c == SEPARATOR || c == '.')
        }
        _ => name,
    }
}

pub struct FilenameBuilder {
    patterns: Vec<RemovalPattern>,
    prefix: String,
    suffix: String,
    remove_id: bool,
}

impl FilenameBuilder {
    pub fn new(config: &SplitConfig) -> Result<Self> {
        let patterns = config
            .removal_patterns
            .iter()
            .map(|p| RemovalPattern::compile(p))
            .collect::<Result<Vec<_>>>()?;

        debug!("Compiled {} removal patterns", patterns.len());

        Ok(Self {
            patterns,
            prefix: config.prefix.clone().unwrap_or_default(),
            suffix: config.suffix.clone().unwrap_or_default(),
            remove_id: config.remove_id,
        })
    }

    pub fn patterns(&self) -> &[RemovalPattern] {
        &self.patterns
    }

    /// Remove every match of every pattern until nothing matches.
    pub fn clean_title(&self, title: &str) -> String {
        let mut current = title.to_string();
        loop {
            let mut changed = false;
            for pattern in &self.patterns {
                let next = pattern.remove_from(&current);
                if next != current {
                    current = next;
                    changed = true;
                }
            }
            if !changed {
                return current;
            }
        }
    }

    pub fn base_name(&self, range: &PageRange) -> String {
        let raw = if self.remove_id {
            range.title.clone()
        } else {
            range.label()
        };
        let cleaned = self.clean_title(&raw);
        let templated = format!("{}{}{}", self.prefix, cleaned.trim(), self.suffix);
        let sanitized = sanitize(&templated);
        let stem = strip_extension(&sanitized);
        if stem.is_empty() {
            FALLBACK_NAME.to_string()
        } else {
            stem.to_string()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `stem.pdf`, or `stem-2.pdf`, `stem-3.pdf`, ... on collision.
    /// The flag is true when a disambiguator was needed.
    pub fn claim(&mut self, stem: &str) -> (String, bool) {
        let first = format!("{}{}", stem, EXTENSION);
        if self.used.insert(first.to_lowercase()) {
            return (first, false);
        }

        let mut n = 2usize;
        loop {
            let candidate = format!("{}-{}{}", stem, n, EXTENSION);
            if self.used.insert(candidate.to_lowercase()) {
                return (candidate, true);
            }
            n += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}
