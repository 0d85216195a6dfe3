use anyhow::Result;
use tracing::info;

use crate::model::{ConstitutionDocument, SectionRecord};

mod anchors;
mod assemble;
mod normalize;
mod report;
mod resolve;
mod segment;
#[cfg(test)]
mod tests;
mod toc;

pub use normalize::{BoilerplateFilter, normalize_text};
pub use report::{Diagnostics, ExtractReport, ShortSectionPreview};
pub use segment::page_index_header_id;

use resolve::HeadingSource;

/// Thresholds and anchors driving the pipeline. Defaults are calibrated to
/// the Guyana constitution PDF; tests substitute synthetic values.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub doc_id: String,
    pub title: String,
    pub toc_marker: String,
    pub body_anchor: String,
    pub division_marker: String,
    pub max_section_numeric: u32,
    pub min_header_count: usize,
    pub first_line_heading_max_chars: usize,
    pub fragment_max_chars: usize,
    pub fragment_keep_ids: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            doc_id: "guyana-constitution".to_string(),
            title: "Constitution of the Co-operative Republic of Guyana".to_string(),
            toc_marker: "ARRANGEMENT OF SECTIONS".to_string(),
            body_anchor: r"(?m)^\s*1\.\s+Guyana\s+is\b".to_string(),
            division_marker: "CHAPTER I".to_string(),
            max_section_numeric: 500,
            min_header_count: 50,
            first_line_heading_max_chars: 60,
            fragment_max_chars: 25,
            fragment_keep_ids: vec!["231".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineCounts {
    pub toc_headings: usize,
    pub headers_accepted: usize,
    pub headers_rejected: usize,
    pub duplicates_collapsed: usize,
    pub fragments_merged: usize,
    pub inline_text_sections: usize,
    pub first_line_headings: usize,
    pub toc_headings_applied: usize,
    pub headingless_sections: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub document: ConstitutionDocument,
    pub counts: PipelineCounts,
}

/// Runs the full structural extraction over the page texts of one PDF
/// snapshot. Fails without partial output when the document layout no
/// longer matches the anchors or the header grammar.
pub fn run_pipeline(pages: &[String], options: &ExtractOptions) -> Result<PipelineOutcome> {
    let filter = BoilerplateFilter::new()?;
    let raw = pages.join("\n");
    let cleaned = filter.strip(&normalize_text(&raw));

    let anchors = anchors::locate_anchors(&cleaned, options)?;
    info!(
        toc_start = anchors.toc_start,
        body_start = anchors.body_start,
        "located document anchors"
    );

    let toc_map = toc::parse_toc_headings(&cleaned[anchors.toc_start..anchors.body_start]);
    info!(
        toc_headings = toc_map.len(),
        "parsed arrangement-of-sections headings"
    );

    let segmented = segment::segment_body(&cleaned[anchors.body_start..], &filter, options)?;

    let mut counts = PipelineCounts {
        toc_headings: toc_map.len(),
        headers_accepted: segmented.sections.len(),
        headers_rejected: segmented.rejected_over_ceiling,
        ..Default::default()
    };

    let raw_count = segmented.sections.len();
    let deduped = assemble::dedupe_sections(segmented.sections);
    counts.duplicates_collapsed = raw_count - deduped.len();

    let mut records: Vec<SectionRecord> = Vec::with_capacity(deduped.len());
    for section in &deduped {
        let resolved = resolve::resolve_heading(section, &toc_map, options);
        match resolved.source {
            HeadingSource::Inline => counts.inline_text_sections += 1,
            HeadingSource::FirstLine => counts.first_line_headings += 1,
            HeadingSource::TableOfContents => counts.toc_headings_applied += 1,
            HeadingSource::None => counts.headingless_sections += 1,
        }

        records.push(SectionRecord {
            chunk_id: section.id.chunk_id(),
            section_number: section.id.to_string(),
            heading: resolved.heading,
            text: resolved.text,
        });
    }

    counts.fragments_merged = assemble::merge_trailing_fragments(&mut records, options);

    let document = ConstitutionDocument {
        doc_id: options.doc_id.clone(),
        title: options.title.clone(),
        sections: records,
    };

    info!(
        sections = document.sections.len(),
        duplicates_collapsed = counts.duplicates_collapsed,
        fragments_merged = counts.fragments_merged,
        "pipeline completed"
    );

    Ok(PipelineOutcome { document, counts })
}
