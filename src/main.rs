mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, PreviewArgs, SplitArgs, ValidateArgs};
use form_splitter::services::BatchProcessor;
use form_splitter::{
    ContentFetcher, DocumentReport, DocumentStatus, FormSplitterError, PdfSource, Result,
    TocParser,
};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Split(args) => handle_split_command(args, &cli.output).await,
        Commands::Preview(args) => handle_preview_command(args).await,
        Commands::Validate(args) => handle_validate_command(args).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn failure_report(source: String, e: &FormSplitterError) -> DocumentReport {
    DocumentReport {
        source,
        status: DocumentStatus::Failed {
            kind: e.kind().to_string(),
            reason: e.to_string(),
        },
    }
}

async fn handle_split_command(args: &SplitArgs, output: &Path) -> anyhow::Result<()> {
    info!("Starting split operation with {} sources", args.sources.len());

    if output.exists() && !args.force {
        return Err(FormSplitterError::OutputFile {
            reason: format!(
                "{} already exists. Use --force to overwrite.",
                output.display()
            ),
        }
        .into());
    }

    // Bad patterns abort before anything is fetched
    let processor = BatchProcessor::new(&args.naming.to_config())?;

    let sources = ContentFetcher::expand_sources(&args.sources)?;
    info!("Resolved {} input documents", sources.len());

    let (documents, fetch_failures) = ContentFetcher::fetch_multiple(&sources).await;
    let mut outcome = processor.process_batch(&documents)?;

    outcome.report.documents.extend(
        fetch_failures
            .iter()
            .map(|(source, e)| failure_report(source.clone(), e)),
    );

    println!("\n=== Split Report ===");
    for document in &outcome.report.documents {
        match &document.status {
            DocumentStatus::Split {
                forms,
                skipped_entries,
                files,
                ..
            } => {
                println!("✓ {}: {} forms detected", document.source, forms);
                for file in files {
                    println!("    {} (pages {})", file.filename, file.pages);
                }
                for skipped in skipped_entries {
                    println!(
                        "    skipped entry '{}' (page {})",
                        skipped.label(),
                        skipped.start_page
                    );
                }
            }
            DocumentStatus::Failed { kind, reason } => {
                println!("✗ {}: {} - {}", document.source, kind, reason);
            }
        }
    }
    println!(
        "Documents split: {}/{}",
        outcome.report.succeeded(),
        outcome.report.documents.len()
    );

    if let Some(report_path) = &args.report_json {
        let json = serde_json::to_string_pretty(&outcome.report)
            .context("Failed to serialize split report")?;
        tokio::fs::write(report_path, json)
            .await
            .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
        info!("Report written to: {}", report_path.display());
    }

    if outcome.results_count == 0 {
        warn!("No forms were split; archive not written");
        anyhow::bail!("none of the {} documents could be split", outcome.report.documents.len());
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(output, &outcome.archive)
        .await
        .with_context(|| format!("Failed to write archive {}", output.display()))?;

    info!(
        "Wrote {} forms to {}",
        outcome.results_count,
        output.display()
    );
    Ok(())
}

async fn handle_preview_command(args: &PreviewArgs) -> anyhow::Result<()> {
    let processor = BatchProcessor::new(&args.naming.to_config())?;
    let sources = ContentFetcher::expand_sources(&args.sources)?;
    let (documents, fetch_failures) = ContentFetcher::fetch_multiple(&sources).await;

    let (rows, mut failures) = processor.preview(&documents);
    failures.extend(
        fetch_failures
            .iter()
            .map(|(source, e)| failure_report(source.clone(), e)),
    );

    println!("\n=== Filename & Page-Range Preview ===");
    println!("{:<28} {:<40} {:<10} Filename", "Source PDF", "Form Name", "Pages");
    for row in &rows {
        let marker = if row.renamed { "  (renamed: duplicate)" } else { "" };
        println!(
            "{:<28} {:<40} {:<10} {}{}",
            row.source, row.form_name, row.pages, row.filename, marker
        );
    }

    if !failures.is_empty() {
        println!("\nCould not preview:");
        for failure in &failures {
            if let DocumentStatus::Failed { kind, reason } = &failure.status {
                println!("  - {}: {} - {}", failure.source, kind, reason);
            }
        }
    }

    if let Some(json_path) = &args.json_output {
        let json_content = serde_json::to_string_pretty(&serde_json::json!({
            "rows": rows,
            "failures": failures,
        }))
        .context("Failed to serialize preview")?;

        tokio::fs::write(json_path, json_content)
            .await
            .context("Failed to write JSON preview file")?;

        info!("Preview written to: {}", json_path.display());
    }

    Ok(())
}

async fn validate_source(source: &str, parser: Option<&TocParser>) -> Result<String> {
    let document = ContentFetcher::fetch_document(source).await?;
    let pdf = PdfSource::load(&document.name, &document.bytes)?;
    let texts = pdf.page_texts()?;

    match parser {
        Some(parser) => {
            let toc = parser.parse(&document.name, &texts)?;
            let stats = parser.get_parsing_stats(&toc);
            let duplicates = stats
                .get("duplicate_titles")
                .and_then(|v| v.as_u64())
                .unwrap_or(0);
            Ok(format!(
                "{} pages, {} TOC entries on pages {:?}, {} duplicate titles",
                pdf.page_count(),
                toc.entries.len(),
                toc.toc_pages,
                duplicates
            ))
        }
        None => Ok(format!("{} pages with text", pdf.page_count())),
    }
}

async fn handle_validate_command(args: &ValidateArgs) -> anyhow::Result<()> {
    info!("Validating {} sources", args.sources.len());

    let parser = if args.skip_toc_check {
        None
    } else {
        Some(TocParser::new(args.toc_pattern.as_deref())?)
    };
    let sources = ContentFetcher::expand_sources(&args.sources)?;

    let mut valid = 0usize;
    let mut invalid = Vec::new();

    for source in &sources {
        match validate_source(source, parser.as_ref()).await {
            Ok(summary) => {
                info!("✓ Valid: {} ({})", source, summary);
                valid += 1;
            }
            Err(e) => {
                error!("✗ Invalid: {} - {}", source, e);
                invalid.push((source, e));
            }
        }
    }

    println!("\n=== Validation Summary ===");
    println!("Valid sources: {}/{}", valid, sources.len());

    if !invalid.is_empty() {
        println!("Invalid sources:");
        for (source, e) in &invalid {
            println!("  - {}: {} - {}", source, e.kind(), e);
        }
        anyhow::bail!("{} sources failed validation", invalid.len());
    }

    println!("All sources are valid!");
    Ok(())
}
