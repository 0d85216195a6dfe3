use std::collections::BTreeMap;

use crate::model::SectionId;

use super::ExtractOptions;
use super::segment::RawSection;

/// Where a section's heading (or, for terminal one-liners, its text) was
/// taken from. Resolution precedence is fixed and order-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingSource {
    /// Header-line text with an otherwise empty chunk: the inline text is
    /// the section's entire content (repealed/reserved one-liners). No
    /// heading is assigned, even when the listing carries one.
    Inline,
    /// A short opening line of the chunk promoted to heading.
    FirstLine,
    /// Looked up from the arrangement-of-sections map.
    TableOfContents,
    None,
}

#[derive(Debug, Clone)]
pub struct ResolvedSection {
    pub heading: Option<String>,
    pub text: String,
    pub source: HeadingSource,
}

pub fn resolve_heading(
    section: &RawSection,
    toc_headings: &BTreeMap<SectionId, String>,
    options: &ExtractOptions,
) -> ResolvedSection {
    let inline = section.inline.trim();
    let body = section.body.trim();

    if body.is_empty() && !inline.is_empty() {
        return ResolvedSection {
            heading: None,
            text: inline.to_string(),
            source: HeadingSource::Inline,
        };
    }

    let mut heading = None;
    let mut text = body.to_string();
    let mut source = HeadingSource::None;

    if inline.is_empty() && !body.is_empty() {
        if let Some((first_line, remainder)) = split_first_line(body) {
            if is_heading_candidate(first_line, options) && !remainder.trim().is_empty() {
                heading = Some(first_line.trim().to_string());
                text = remainder.trim().to_string();
                source = HeadingSource::FirstLine;
            }
        }
    }

    if heading.is_none() {
        if let Some(toc_heading) = toc_headings.get(&section.id) {
            heading = Some(toc_heading.clone());
            source = HeadingSource::TableOfContents;
        }
    }

    ResolvedSection {
        heading,
        text,
        source,
    }
}

fn split_first_line(body: &str) -> Option<(&str, &str)> {
    body.split_once('\n')
}

/// A first line qualifies as a heading when it is short and is not itself
/// the opening numbered subclause of the section.
fn is_heading_candidate(line: &str, options: &ExtractOptions) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() < options.first_line_heading_max_chars
        && !starts_with_clause_marker(trimmed)
}

fn starts_with_clause_marker(line: &str) -> bool {
    let Some(rest) = line.strip_prefix('(') else {
        return false;
    };
    rest.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false)
}
