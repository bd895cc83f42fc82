use crate::error::{FormSplitterError, Result};
use crate::services::archive::ArchivePackager;
use crate::services::extractor::PdfSource;
use crate::services::namer::{FilenameBuilder, NameRegistry};
use crate::services::parser::TocParser;
use crate::services::resolver::RangeResolver;
use crate::services::splitter::DocumentSplitter;
use crate::types::{
    BatchOutcome, BatchReport, DocumentReport, DocumentStatus, OutputFile, ParsedToc,
    PreviewRow, ResolvedRanges, SourceDocument, SplitConfig, SplitResult,
};
use tracing::{debug, error, info, warn};

pub struct AnalyzedDocument {
    pub source: PdfSource,
    pub toc: ParsedToc,
    pub resolved: ResolvedRanges,
}

pub struct BatchProcessor {
    parser: TocParser,
    namer: FilenameBuilder,
}

impl BatchProcessor {
    /// Compiles the TOC grammar and removal patterns; a bad pattern fails here,
    /// before any document is touched.
    pub fn new(config: &SplitConfig) -> Result<Self> {
        let parser = TocParser::new(config.toc_pattern.as_deref())?;
        let namer = FilenameBuilder::new(config)?;

        let sources: Vec<&str> = namer.patterns().iter().map(|p| p.source()).collect();
        debug!("Removal patterns: {:?}", sources);

        Ok(Self { parser, namer })
    }

    pub fn analyze(&self, document: &SourceDocument) -> Result<AnalyzedDocument> {
        let source = PdfSource::load(&document.name, &document.bytes)?;
        let page_texts = source.page_texts()?;
        let toc = self.parser.parse(&document.name, &page_texts)?;
        let resolved = RangeResolver::resolve(&toc.entries, source.page_count())?;

        Ok(AnalyzedDocument {
            source,
            toc,
            resolved,
        })
    }

    pub fn process_document(
        &self,
        document: &SourceDocument,
        registry: &mut NameRegistry,
    ) -> Result<(Vec<SplitResult>, DocumentStatus)> {
        let analyzed = self.analyze(document)?;
        let results = DocumentSplitter::split_document(
            &analyzed.source,
            &analyzed.resolved.ranges,
            &self.namer,
            registry,
        )?;

        let files = results
            .iter()
            .map(|r| OutputFile {
                filename: r.filename.clone(),
                title: r.title.clone(),
                pages: format!("{}–{}", r.start_page, r.end_page - 1),
                page_count: r.page_count(),
            })
            .collect();

        let status = DocumentStatus::Split {
            forms: results.len(),
            toc_pages: analyzed.toc.toc_pages,
            skipped_entries: analyzed.resolved.skipped,
            files,
        };

        Ok((results, status))
    }

    pub fn process_batch(&self, documents: &[SourceDocument]) -> Result<BatchOutcome> {
        let mut registry = NameRegistry::new();
        let mut all_results = Vec::new();
        let mut reports = Vec::with_capacity(documents.len());

        for (idx, document) in documents.iter().enumerate() {
            info!(
                "Processing document {}/{}: {}",
                idx + 1,
                documents.len(),
                document.name
            );

            let status = match self.process_document(document, &mut registry) {
                Ok((results, status)) => {
                    all_results.extend(results);
                    status
                }
                Err(e) => failed_status(&document.name, &e),
            };

            reports.push(DocumentReport {
                source: document.name.clone(),
                status,
            });
        }

        let archive = ArchivePackager::package(&all_results)?;
        let report = BatchReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            documents: reports,
        };

        info!(
            "Batch finished: {} succeeded, {} failed, {} files archived",
            report.succeeded(),
            report.failed(),
            all_results.len()
        );

        Ok(BatchOutcome {
            archive,
            report,
            results_count: all_results.len(),
        })
    }

    pub fn preview(&self, documents: &[SourceDocument]) -> (Vec<PreviewRow>, Vec<DocumentReport>) {
        let mut registry = NameRegistry::new();
        let mut rows = Vec::new();
        let mut failures = Vec::new();

        for document in documents {
            let analyzed = match self.analyze(document) {
                Ok(analyzed) => analyzed,
                Err(e) => {
                    failures.push(DocumentReport {
                        source: document.name.clone(),
                        status: failed_status(&document.name, &e),
                    });
                    continue;
                }
            };

            let plan = DocumentSplitter::plan_filenames(
                &analyzed.resolved.ranges,
                &self.namer,
                &mut registry,
            );
            rows.extend(plan.into_iter().map(|planned| PreviewRow {
                source: document.name.clone(),
                form_name: planned.range.label(),
                pages: planned.range.display_pages(),
                filename: planned.filename,
                renamed: planned.renamed,
            }));
        }

        (rows, failures)
    }
}

// Bad input only costs its own document; anything else is logged as a fault
fn failed_status(name: &str, e: &FormSplitterError) -> DocumentStatus {
    if e.is_document_error() {
        warn!("Skipping '{}': {}", name, e);
    } else {
        error!("Unexpected failure on '{}': {}", name, e);
    }

    DocumentStatus::Failed {
        kind: e.kind().to_string(),
        reason: e.to_string(),
    }
}

pub fn process_batch(documents: &[SourceDocument], config: &SplitConfig) -> Result<BatchOutcome> {
    BatchProcessor::new(config)?.process_batch(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_export, build_pdf, build_segmented_export, source};
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn config() -> SplitConfig {
        SplitConfig {
            remove_id: true,
            ..SplitConfig::default()
        }
    }

    fn archive_entries(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut zip = ZipArchive::new(Cursor::new(archive.to_vec())).unwrap();
        (0..zip.len())
            .map(|idx| {
                let mut file = zip.by_index(idx).unwrap();
                let mut content = Vec::new();
                file.read_to_end(&mut content).unwrap();
                (file.name().to_string(), content)
            })
            .collect()
    }

    #[test]
    fn test_batch_splits_export_into_archive() {
        let pdf = build_export(
            10,
            &[
                "#101: Site Survey Report ......... 3",
                "#102: Inspection Checklist ......... 7",
            ],
        );

        let outcome = process_batch(&[source("export.pdf", pdf)], &config()).unwrap();
        assert_eq!(outcome.results_count, 2);
        assert_eq!(outcome.report.succeeded(), 1);

        let entries = archive_entries(&outcome.archive);
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Site_Survey_Report.pdf", "Inspection_Checklist.pdf"]);

        let pages: Vec<u32> = entries
            .iter()
            .map(|(n, bytes)| PdfSource::load(n, bytes).unwrap().page_count())
            .collect();
        assert_eq!(pages, vec![4, 4]);

        match &outcome.report.documents[0].status {
            DocumentStatus::Split { forms, toc_pages, .. } => {
                assert_eq!(*forms, 2);
                assert_eq!(toc_pages, &vec![1]);
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_batch_splits_export_with_separately_drawn_page_numbers() {
        let pdf = build_segmented_export(
            10,
            &[
                ("#101: Site Survey Report", 3),
                ("#102: Inspection Checklist", 7),
            ],
        );

        let processor = BatchProcessor::new(&config()).unwrap();
        let analyzed = processor.analyze(&source("export.pdf", pdf)).unwrap();
        let spans: Vec<(String, u32, u32)> = analyzed
            .resolved
            .ranges
            .iter()
            .map(|r| (r.title.clone(), r.start_page, r.end_page))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("Site Survey Report".to_string(), 3, 7),
                ("Inspection Checklist".to_string(), 7, 11),
            ]
        );
    }

    #[test]
    fn test_outputs_reassemble_covered_pages_in_order() {
        let pdf = build_export(7, &["#1: Cover .. 1", "#2: Log .. 2", "#3: Photos .. 5"]);
        let outcome = process_batch(&[source("export.pdf", pdf)], &config()).unwrap();

        let mut markers = Vec::new();
        for (name, bytes) in archive_entries(&outcome.archive) {
            let part = PdfSource::load(&name, &bytes).unwrap();
            for text in part.page_texts().unwrap() {
                let marker = text
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .unwrap_or_default()
                    .to_string();
                markers.push(marker);
            }
        }

        let expected: Vec<String> = (1..=7).map(|p| format!("Page {}", p)).collect();
        assert_eq!(markers, expected);
    }

    #[test]
    fn test_failures_are_reported_per_document() {
        let good = build_export(4, &["#1: Inspection .. 2", "#2: Inspection .. 3"]);
        let no_toc = build_export(3, &[]);
        let scanned = build_pdf(&[vec![]]);

        let outcome = process_batch(
            &[
                source("no-toc.pdf", no_toc),
                source("junk.pdf", b"%PDF-broken".to_vec()),
                source("scan.pdf", scanned),
                source("good.pdf", good),
            ],
            &config(),
        )
        .unwrap();

        let kinds: Vec<String> = outcome
            .report
            .documents
            .iter()
            .map(|d| match &d.status {
                DocumentStatus::Split { .. } => "ok".to_string(),
                DocumentStatus::Failed { kind, .. } => kind.clone(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["NoTocFoundError", "UnreadablePdfError", "UnreadablePdfError", "ok"]
        );
        assert_eq!(outcome.report.failed(), 3);

        let names: Vec<String> = archive_entries(&outcome.archive)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["Inspection.pdf", "Inspection-2.pdf"]);
    }

    #[test]
    fn test_failed_status_keeps_kind_and_reason() {
        let status = failed_status("a.pdf", &FormSplitterError::Anyhow(anyhow::anyhow!("disk gone")));
        match status {
            DocumentStatus::Failed { kind, reason } => {
                assert_eq!(kind, "InternalError");
                assert!(reason.contains("disk gone"));
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_filenames_are_unique_across_documents() {
        let first = build_export(3, &["#1: Daily Log .. 2"]);
        let second = build_export(3, &["#9: Daily Log .. 2"]);

        let outcome = process_batch(
            &[source("a.pdf", first), source("b.pdf", second)],
            &config(),
        )
        .unwrap();

        let names: Vec<String> = archive_entries(&outcome.archive)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["Daily_Log.pdf", "Daily_Log-2.pdf"]);
    }

    #[test]
    fn test_invalid_pattern_aborts_before_processing() {
        let pdf = build_export(3, &["#1: Daily Log .. 2"]);
        let result = process_batch(
            &[source("a.pdf", pdf)],
            &SplitConfig {
                removal_patterns: vec!["[".to_string()],
                ..config()
            },
        );
        assert!(matches!(result, Err(FormSplitterError::InvalidPattern { .. })));
    }

    #[test]
    fn test_preview_rows() {
        let pdf = build_export(6, &["#101: Inspection .. 2", "#102: Inspection .. 4"]);
        let processor = BatchProcessor::new(&config()).unwrap();
        let (rows, failures) = processor.preview(&[
            source("export.pdf", pdf),
            source("broken.pdf", b"nope".to_vec()),
        ]);

        assert_eq!(
            rows,
            vec![
                PreviewRow {
                    source: "export.pdf".to_string(),
                    form_name: "#101: Inspection".to_string(),
                    pages: "2–3".to_string(),
                    filename: "Inspection.pdf".to_string(),
                    renamed: false,
                },
                PreviewRow {
                    source: "export.pdf".to_string(),
                    form_name: "#102: Inspection".to_string(),
                    pages: "4–6".to_string(),
                    filename: "Inspection-2.pdf".to_string(),
                    renamed: true,
                },
            ]
        );
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].source, "broken.pdf");
    }
}
