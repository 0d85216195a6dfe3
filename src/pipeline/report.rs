use std::collections::{HashMap, HashSet};

use crate::model::SectionRecord;

use super::PipelineCounts;

const DUPLICATE_PREVIEW_LIMIT: usize = 10;
const EMPTY_PREVIEW_LIMIT: usize = 15;
const GAP_EXAMPLE_LIMIT: usize = 10;
const SHORTEST_PREVIEW_COUNT: usize = 15;
const PREVIEW_CHARS: usize = 120;

#[derive(Debug, Clone)]
pub struct ShortSectionPreview {
    pub chunk_id: String,
    pub section_number: String,
    pub length: usize,
    pub preview: String,
}

/// Advisory diagnostics over an emitted section list. Computed after the
/// fact and never fed back into the pipeline; a nonzero duplicate count
/// means a defect upstream, not something to repair here.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    pub section_count: usize,
    pub duplicate_chunk_ids: Vec<String>,
    pub empty_chunk_ids: Vec<String>,
    pub shortest: Vec<ShortSectionPreview>,
    pub numeric_range: Option<(u32, u32)>,
    pub numeric_gaps: Vec<(u32, u32)>,
}

impl Diagnostics {
    pub fn compute(sections: &[SectionRecord]) -> Self {
        let mut id_counts: HashMap<&str, usize> = HashMap::new();
        for section in sections {
            *id_counts.entry(section.chunk_id.as_str()).or_insert(0) += 1;
        }

        let mut seen = HashSet::new();
        let duplicate_chunk_ids = sections
            .iter()
            .filter(|section| id_counts[section.chunk_id.as_str()] > 1)
            .filter(|section| seen.insert(section.chunk_id.clone()))
            .map(|section| section.chunk_id.clone())
            .collect();

        let empty_chunk_ids = sections
            .iter()
            .filter(|section| section.text.trim().is_empty())
            .map(|section| section.chunk_id.clone())
            .collect();

        let mut by_length: Vec<&SectionRecord> = sections.iter().collect();
        by_length.sort_by_key(|section| section.text.trim().chars().count());
        let shortest = by_length
            .iter()
            .take(SHORTEST_PREVIEW_COUNT)
            .map(|section| {
                let flattened = section.text.replace('\n', " ").trim().to_string();
                ShortSectionPreview {
                    chunk_id: section.chunk_id.clone(),
                    section_number: section.section_number.clone(),
                    length: flattened.chars().count(),
                    preview: flattened.chars().take(PREVIEW_CHARS).collect(),
                }
            })
            .collect();

        let mut numeric: Vec<u32> = sections
            .iter()
            .filter(|section| {
                !section.section_number.is_empty()
                    && section.section_number.chars().all(|c| c.is_ascii_digit())
            })
            .filter_map(|section| section.section_number.parse().ok())
            .collect();
        numeric.sort_unstable();

        let numeric_range = numeric
            .first()
            .zip(numeric.last())
            .map(|(min, max)| (*min, *max));
        let numeric_gaps = numeric
            .windows(2)
            .filter(|pair| pair[1] != pair[0] + 1)
            .map(|pair| (pair[0], pair[1]))
            .collect();

        Self {
            section_count: sections.len(),
            duplicate_chunk_ids,
            empty_chunk_ids,
            shortest,
            numeric_range,
            numeric_gaps,
        }
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        self.render_into(&mut lines);
        lines.join("\n") + "\n"
    }

    fn render_into(&self, lines: &mut Vec<String>) {
        lines.push(format!("Output sections: {}", self.section_count));

        lines.push(format!(
            "Duplicate chunk_id: {}",
            self.duplicate_chunk_ids.len()
        ));
        if !self.duplicate_chunk_ids.is_empty() {
            lines.push(format!(
                "  {}",
                self.duplicate_chunk_ids
                    .iter()
                    .take(DUPLICATE_PREVIEW_LIMIT)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        lines.push(format!(
            "Empty text sections: {}",
            self.empty_chunk_ids.len()
        ));
        if !self.empty_chunk_ids.is_empty() {
            lines.push(format!(
                "  {}",
                self.empty_chunk_ids
                    .iter()
                    .take(EMPTY_PREVIEW_LIMIT)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        lines.push(String::new());
        if let Some((min, max)) = self.numeric_range {
            lines.push(format!("Numeric min/max: {min}..{max}"));
            lines.push(format!("Numeric gaps: {}", self.numeric_gaps.len()));
            if !self.numeric_gaps.is_empty() {
                let examples = self
                    .numeric_gaps
                    .iter()
                    .take(GAP_EXAMPLE_LIMIT)
                    .map(|(a, b)| format!("({a}, {b})"))
                    .collect::<Vec<_>>()
                    .join(", ");
                lines.push(format!("  Examples: {examples}"));
            }
        }

        lines.push(String::new());
        lines.push("Shortest sections preview:".to_string());
        for entry in &self.shortest {
            lines.push(format!(
                "  {} ({}): len={} '{}'",
                entry.chunk_id, entry.section_number, entry.length, entry.preview
            ));
        }
    }
}

/// The plain-text report written next to the extraction outputs.
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub pdf_path: String,
    pub out_path: String,
    pub generated_at: String,
    pub pdf_sha256: String,
    pub counts: PipelineCounts,
    pub diagnostics: Diagnostics,
}

impl ExtractReport {
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("PDF_PATH: {}", self.pdf_path));
        lines.push(format!("OUT_PATH: {}", self.out_path));
        lines.push(format!("GENERATED_AT: {}", self.generated_at));
        lines.push(format!("PDF_SHA256: {}", self.pdf_sha256));
        lines.push(String::new());

        lines.push(format!("TOC headings found: {}", self.counts.toc_headings));
        lines.push(format!(
            "Body headers accepted: {} (rejected over ceiling: {})",
            self.counts.headers_accepted, self.counts.headers_rejected
        ));
        lines.push(format!(
            "Duplicates collapsed: {}",
            self.counts.duplicates_collapsed
        ));
        lines.push(format!(
            "Fragments merged: {}",
            self.counts.fragments_merged
        ));
        lines.push(format!(
            "Heading sources: inline-as-text={} first-line={} toc={} none={}",
            self.counts.inline_text_sections,
            self.counts.first_line_headings,
            self.counts.toc_headings_applied,
            self.counts.headingless_sections
        ));
        lines.push(String::new());

        self.diagnostics.render_into(&mut lines);
        lines.join("\n") + "\n"
    }
}
