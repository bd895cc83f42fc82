use crate::error::{FormSplitterError, Result};
use crate::types::{DocumentMetadata, SourceDocument, SourceType};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};
use url::Url;
use walkdir::WalkDir;

pub struct ContentFetcher;

impl ContentFetcher {
    pub async fn fetch_document(source: &str) -> Result<SourceDocument> {
        if Self::is_url(source) {
            Self::fetch_from_url(source).await
        } else {
            Self::fetch_from_file(source).await
        }
    }

    /// Fetch every source; sources that cannot be read are returned with
    /// their error instead of stopping the rest.
    pub async fn fetch_multiple(
        sources: &[String],
    ) -> (Vec<SourceDocument>, Vec<(String, FormSplitterError)>) {
        let mut documents = Vec::new();
        let mut failures = Vec::new();

        for source in sources {
            match Self::fetch_document(source).await {
                Ok(document) => {
                    info!("Fetched {} ({} bytes)", source, document.bytes.len());
                    documents.push(document);
                }
                Err(e) => {
                    warn!("Failed to fetch {}: {}", source, e);
                    failures.push((source.clone(), e));
                }
            }
        }

        (documents, failures)
    }

    async fn fetch_from_url(url: &str) -> Result<SourceDocument> {
        info!("Downloading PDF from URL: {}", url);

        let parsed_url = Url::parse(url)?;
        let client = reqwest::Client::new();
        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FormSplitterError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        let filename = Self::extract_filename_from_url(&parsed_url);

        let metadata = DocumentMetadata {
            filename: filename.clone(),
            source_type: SourceType::Url,
            fetched_at: chrono::Utc::now().to_rfc3339(),
            size_bytes: bytes.len(),
        };

        Ok(SourceDocument::new(filename, bytes, metadata))
    }

    async fn fetch_from_file(file_path: &str) -> Result<SourceDocument> {
        debug!("Reading file: {}", file_path);

        let path = Path::new(file_path);

        if !path.is_file() {
            return Err(FormSplitterError::FileNotFound {
                path: file_path.to_string(),
            });
        }

        let bytes = fs::read(path).await?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.pdf")
            .to_string();

        let metadata = DocumentMetadata {
            filename: filename.clone(),
            source_type: SourceType::LocalFile,
            fetched_at: chrono::Utc::now().to_rfc3339(),
            size_bytes: bytes.len(),
        };

        Ok(SourceDocument::new(filename, bytes, metadata))
    }

    pub fn is_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    fn extract_filename_from_url(url: &Url) -> String {
        url.path_segments()
            .and_then(|segments| segments.last())
            .and_then(|name| if name.is_empty() { None } else { Some(name) })
            .unwrap_or("downloaded.pdf")
            .to_string()
    }

    fn is_pdf(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
    }

    pub fn expand_sources(sources: &[String]) -> Result<Vec<String>> {
        let mut expanded = Vec::new();

        for source in sources {
            if Self::is_url(source) {
                Url::parse(source)?;
                expanded.push(source.clone());
                continue;
            }

            let path = Path::new(source);
            if path.is_file() {
                expanded.push(source.clone());
            } else if path.is_dir() {
                let mut found: Vec<String> = WalkDir::new(path)
                    .follow_links(true)
                    .into_iter()
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().is_file() && Self::is_pdf(entry.path()))
                    .map(|entry| entry.path().display().to_string())
                    .collect();
                found.sort();

                debug!("Directory {} holds {} PDFs", source, found.len());
                expanded.extend(found);
            } else {
                return Err(FormSplitterError::FileNotFound {
                    path: source.clone(),
                });
            }
        }

        Ok(expanded)
    }
}
