use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::ReportArgs;
use crate::model::ConstitutionDocument;
use crate::pipeline::Diagnostics;

/// Recomputes the advisory diagnostics from an already-extracted document
/// without touching the PDF.
pub fn run(args: ReportArgs) -> Result<()> {
    let raw = fs::read(&args.sections_path)
        .with_context(|| format!("failed to read {}", args.sections_path.display()))?;
    let document: ConstitutionDocument = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", args.sections_path.display()))?;

    let diagnostics = Diagnostics::compute(&document.sections);

    info!(
        doc_id = %document.doc_id,
        sections = diagnostics.section_count,
        duplicates = diagnostics.duplicate_chunk_ids.len(),
        empty = diagnostics.empty_chunk_ids.len(),
        "diagnostics computed"
    );

    print!("{}", diagnostics.render());

    Ok(())
}
