use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "constitution-extract",
    version,
    about = "Constitution PDF structural extraction and page-index tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    PageIndex(PageIndexArgs),
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = "law_sources/constitution.pdf")]
    pub pdf_path: PathBuf,

    #[arg(long, default_value = "constitution.json")]
    pub out_path: PathBuf,

    #[arg(long, default_value = "extractor_report.txt")]
    pub report_path: PathBuf,

    #[arg(long, default_value = "guyana-constitution")]
    pub doc_id: String,

    #[arg(
        long,
        default_value = "Constitution of the Co-operative Republic of Guyana"
    )]
    pub title: String,

    /// Marker phrase that opens the arrangement-of-sections listing.
    #[arg(long, default_value = "ARRANGEMENT OF SECTIONS")]
    pub toc_marker: String,

    /// Regex matching the opening line of the first substantive section.
    #[arg(long, default_value = r"(?m)^\s*1\.\s+Guyana\s+is\b")]
    pub body_anchor: String,

    /// Top-level division heading scanned for backwards from the body anchor.
    #[arg(long, default_value = "CHAPTER I")]
    pub division_marker: String,

    /// Section numbers above this are treated as false positives (years etc.).
    #[arg(long, default_value_t = 500)]
    pub max_section_numeric: u32,

    #[arg(long, default_value_t = 50)]
    pub min_header_count: usize,

    #[arg(long, default_value_t = 60)]
    pub first_line_heading_max_chars: usize,

    #[arg(long, default_value_t = 25)]
    pub fragment_max_chars: usize,

    /// Section numbers exempt from trailing-fragment merging.
    #[arg(long = "fragment-keep-id", default_value = "231")]
    pub fragment_keep_ids: Vec<String>,

    #[arg(long)]
    pub max_pages: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct PageIndexArgs {
    /// Constants source declaring CONSTITUTION_PDF_PATH.
    #[arg(long, default_value = "src/constants/index.ts")]
    pub constants_path: PathBuf,

    /// URL lookup table keyed by canonical relative PDF path.
    #[arg(long, default_value = "src/assets/acts-pdf-urls.json")]
    pub urls_path: PathBuf,

    /// Extracted constitution document whose section set bounds the index.
    #[arg(long, default_value = "constitution.json")]
    pub sections_path: PathBuf,

    #[arg(long, default_value = "constitution-page-index.json")]
    pub out_path: PathBuf,

    #[arg(long, default_value = ".cache/constitution-extract")]
    pub cache_dir: PathBuf,

    /// Use an already-downloaded PDF instead of fetching by URL.
    #[arg(long)]
    pub local_pdf: Option<PathBuf>,

    #[arg(long, default_value = r"(?m)^\s*1\.\s+Guyana\s+is\b")]
    pub body_anchor: String,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[arg(long, default_value = "constitution.json")]
    pub sections_path: PathBuf,
}
