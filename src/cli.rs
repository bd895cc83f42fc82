use clap::{Args, Parser, Subcommand};
use form_splitter::services::split_pattern_list;
use form_splitter::SplitConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "form-split")]
#[command(about = "Split ACC Build Form exports into one PDF per form using the embedded table of contents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Archive to write split forms into
    #[arg(short, long, global = true, default_value = "./forms.zip")]
    pub output: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split exports and package every form into one archive
    Split(SplitArgs),

    /// Show form names, page ranges and filenames without splitting
    Preview(PreviewArgs),

    /// Check that sources are readable PDFs with a table of contents
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct NamingArgs {
    /// Comma-separated removal patterns (regex or `*` wildcard)
    #[arg(short, long, value_name = "PATTERNS")]
    pub remove: Option<String>,

    /// Text prepended to every filename
    #[arg(long)]
    pub prefix: Option<String>,

    /// Text appended to every filename, before the extension
    #[arg(long)]
    pub suffix: Option<String>,

    /// Keep the `#id:` form identifier in filenames
    #[arg(long)]
    pub keep_id: bool,

    /// Custom TOC line regex with a named `title` group (optional `id`, `page`)
    #[arg(long, value_name = "REGEX")]
    pub toc_pattern: Option<String>,
}

impl NamingArgs {
    pub fn to_config(&self) -> SplitConfig {
        SplitConfig {
            removal_patterns: self
                .remove
                .as_deref()
                .map(split_pattern_list)
                .unwrap_or_default(),
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
            remove_id: !self.keep_id,
            toc_pattern: self.toc_pattern.clone(),
        }
    }
}

#[derive(Args)]
pub struct SplitArgs {
    /// Input sources (PDF files, directories or URLs)
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    #[command(flatten)]
    pub naming: NamingArgs,

    /// Write the per-document report as JSON
    #[arg(long, value_name = "FILE")]
    pub report_json: Option<PathBuf>,

    /// Overwrite an existing archive
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Input sources (PDF files, directories or URLs)
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    #[command(flatten)]
    pub naming: NamingArgs,

    /// Output preview rows to a JSON file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Input sources (PDF files, directories or URLs)
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Custom TOC line regex with a named `title` group
    #[arg(long, value_name = "REGEX")]
    pub toc_pattern: Option<String>,

    /// Only check that sources are readable PDFs
    #[arg(long)]
    pub skip_toc_check: bool,
}
