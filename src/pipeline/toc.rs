use std::collections::BTreeMap;

use crate::model::SectionId;

/// Parses the arrangement-of-sections region into an identifier-to-heading
/// map. A header line is `<identifier>.` followed by heading text; any
/// other non-blank line continues the heading of the identifier currently
/// being accumulated. Headings that come out empty are skipped, so an
/// unparseable region simply yields an empty map.
pub fn parse_toc_headings(toc_text: &str) -> BTreeMap<SectionId, String> {
    let mut headings = BTreeMap::new();
    let mut current: Option<SectionId> = None;
    let mut parts: Vec<String> = Vec::new();

    for line in toc_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((id, heading_start)) = parse_toc_header_line(line) {
            flush_heading(&mut headings, current.take(), &mut parts);
            current = Some(id);
            parts.push(heading_start.to_string());
        } else if current.is_some() {
            parts.push(line.to_string());
        }
    }

    flush_heading(&mut headings, current.take(), &mut parts);
    headings
}

fn parse_toc_header_line(line: &str) -> Option<(SectionId, &str)> {
    let (id, rest) = SectionId::take_prefix(line)?;
    let rest = rest.strip_prefix('.')?;
    let heading_start = rest.trim();
    if heading_start.is_empty() {
        return None;
    }
    Some((id, heading_start))
}

fn flush_heading(
    headings: &mut BTreeMap<SectionId, String>,
    id: Option<SectionId>,
    parts: &mut Vec<String>,
) {
    let parts = std::mem::take(parts);
    let Some(id) = id else {
        return;
    };

    let joined = parts.join(" ");
    let heading = strip_trailing_page_number(&joined).trim().to_string();
    if !heading.is_empty() {
        headings.insert(id, heading);
    }
}

/// Listing entries often end with the page number of the section; a
/// trailing standalone number is dropped. A heading that is nothing but
/// digits is left alone.
fn strip_trailing_page_number(heading: &str) -> &str {
    let trimmed = heading.trim_end();
    let without_digits = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == trimmed.len() {
        return trimmed;
    }

    let cut = without_digits.trim_end();
    if cut.len() < without_digits.len() && !cut.is_empty() {
        return cut;
    }

    trimmed
}
