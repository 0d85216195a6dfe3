use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::model::SectionId;

use super::ExtractOptions;
use super::normalize::BoilerplateFilter;

/// One detected section before heading resolution: the identifier, any
/// text that followed the separator on the header line, and the chunk of
/// body text running up to the next accepted header.
#[derive(Debug, Clone)]
pub struct RawSection {
    pub id: SectionId,
    pub inline: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct SegmentedBody {
    pub sections: Vec<RawSection>,
    pub rejected_over_ceiling: usize,
}

/// A section header line: optional leading whitespace, identifier, one
/// separator out of `.`/`-`/`:`, optional inline text. Stricter than the
/// listing grammar in the separators it accepts, looser in allowing
/// whitespace before the separator.
fn parse_header_line(line: &str) -> Option<(SectionId, &str)> {
    let trimmed = line.trim_start();
    let (id, rest) = SectionId::take_prefix(trimmed)?;
    let rest = rest.trim_start();

    let mut chars = rest.chars();
    match chars.next() {
        Some('.') | Some('-') | Some(':') => Some((id, chars.as_str().trim())),
        _ => None,
    }
}

/// The page-index walk uses a narrower header shape: `<identifier>.`
/// followed by at least one space. Returns the identifier when `line`
/// opens a section.
pub fn page_index_header_id(line: &str) -> Option<SectionId> {
    let trimmed = line.trim_start();
    let (id, rest) = SectionId::take_prefix(trimmed)?;
    let rest = rest.strip_prefix('.')?;
    if rest.starts_with([' ', '\t']) {
        Some(id)
    } else {
        None
    }
}

struct HeaderMatch {
    id: SectionId,
    inline: String,
    line_start: usize,
    content_start: usize,
}

/// Scans the body region line by line, accepting section header lines and
/// slicing the text between consecutive accepted headers into chunks.
/// Identifiers with a numeric base above the configured ceiling are
/// rejected outright; they are years or cross-references, and they neither
/// produce sections nor terminate the chunk they sit inside.
pub fn segment_body(
    body: &str,
    filter: &BoilerplateFilter,
    options: &ExtractOptions,
) -> Result<SegmentedBody, ExtractError> {
    let mut matches: Vec<HeaderMatch> = Vec::new();
    let mut rejected_over_ceiling = 0usize;
    let mut offset = 0usize;

    for line in body.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let content = line.strip_suffix('\n').unwrap_or(line);
        let Some((id, inline)) = parse_header_line(content) else {
            continue;
        };

        if id.numeric > options.max_section_numeric {
            rejected_over_ceiling += 1;
            debug!(
                identifier = %id,
                ceiling = options.max_section_numeric,
                "rejected numerically implausible section header"
            );
            continue;
        }

        matches.push(HeaderMatch {
            id,
            inline: inline.to_string(),
            line_start,
            content_start: line_start + line.len(),
        });
    }

    if matches.len() < options.min_header_count {
        warn!(
            found = matches.len(),
            required = options.min_header_count,
            "too few section headers detected"
        );
        return Err(ExtractError::InsufficientHeadings {
            found: matches.len(),
            required: options.min_header_count,
        });
    }

    let mut sections = Vec::with_capacity(matches.len());
    for (index, header) in matches.iter().enumerate() {
        let chunk_end = matches
            .get(index + 1)
            .map(|next| next.line_start)
            .unwrap_or(body.len());
        let chunk = &body[header.content_start.min(chunk_end)..chunk_end];

        // Boilerplate can resurface mid-chunk at page boundaries.
        let chunk = filter.strip(chunk.trim()).trim().to_string();

        sections.push(RawSection {
            id: header.id.clone(),
            inline: header.inline.clone(),
            body: chunk,
        });
    }

    Ok(SegmentedBody {
        sections,
        rejected_over_ceiling,
    })
}
