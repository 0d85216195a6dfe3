use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use crate::cli::ExtractArgs;
use crate::pdftext;
use crate::pipeline::{self, Diagnostics, ExtractOptions, ExtractReport};
use crate::util::{ensure_directory, now_utc_string, sha256_file, write_json_pretty};

pub fn run(args: ExtractArgs) -> Result<()> {
    if !args.pdf_path.exists() {
        bail!("source PDF not found: {}", args.pdf_path.display());
    }

    info!(pdf = %args.pdf_path.display(), "starting extraction");

    let pages = pdftext::extract_pages(&args.pdf_path, args.max_pages)?;
    info!(page_count = pages.len(), "extracted text layer");

    let options = options_from_args(&args);
    let outcome = pipeline::run_pipeline(&pages, &options)?;

    let diagnostics = Diagnostics::compute(&outcome.document.sections);
    if !diagnostics.duplicate_chunk_ids.is_empty() {
        warn!(
            duplicates = diagnostics.duplicate_chunk_ids.len(),
            "duplicate chunk ids survived deduplication"
        );
    }

    write_json_pretty(&args.out_path, &outcome.document)?;
    info!(
        sections = outcome.document.sections.len(),
        path = %args.out_path.display(),
        "wrote constitution document"
    );

    let report = ExtractReport {
        pdf_path: args.pdf_path.display().to_string(),
        out_path: args.out_path.display().to_string(),
        generated_at: now_utc_string(),
        pdf_sha256: sha256_file(&args.pdf_path)?,
        counts: outcome.counts,
        diagnostics,
    };

    if let Some(parent) = args.report_path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(&args.report_path, report.render())
        .with_context(|| format!("failed to write report: {}", args.report_path.display()))?;

    info!(path = %args.report_path.display(), "wrote extraction report");

    Ok(())
}

fn options_from_args(args: &ExtractArgs) -> ExtractOptions {
    ExtractOptions {
        doc_id: args.doc_id.clone(),
        title: args.title.clone(),
        toc_marker: args.toc_marker.clone(),
        body_anchor: args.body_anchor.clone(),
        division_marker: args.division_marker.clone(),
        max_section_numeric: args.max_section_numeric,
        min_header_count: args.min_header_count,
        first_line_heading_max_chars: args.first_line_heading_max_chars,
        fragment_max_chars: args.fragment_max_chars,
        fragment_keep_ids: args.fragment_keep_ids.clone(),
    }
}
