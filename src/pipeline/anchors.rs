use anyhow::{Context, Result, bail};
use regex::Regex;

use crate::error::ExtractError;

use super::ExtractOptions;

/// Byte offsets delimiting the two document regions: the
/// arrangement-of-sections listing at `[toc_start, body_start)` and the
/// substantive body at `[body_start, ..]`. Frontmatter before `toc_start`
/// is discarded.
#[derive(Debug, Clone, Copy)]
pub struct Anchors {
    pub toc_start: usize,
    pub body_start: usize,
}

pub fn locate_anchors(text: &str, options: &ExtractOptions) -> Result<Anchors> {
    let toc_pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&options.toc_marker)))
        .context("failed to compile table-of-contents marker pattern")?;
    let toc_start = match toc_pattern.find(text) {
        Some(found) => found.start(),
        None => {
            return Err(ExtractError::TocMarkerNotFound {
                marker: options.toc_marker.clone(),
            }
            .into());
        }
    };

    let body_anchor = Regex::new(&options.body_anchor)
        .with_context(|| format!("failed to compile body anchor pattern: {}", options.body_anchor))?;
    let anchor_start = match body_anchor.find(text) {
        Some(found) => found.start(),
        None => {
            return Err(ExtractError::BodyAnchorNotFound {
                anchor: options.body_anchor.clone(),
            }
            .into());
        }
    };

    // The anchor is the first section's opening prose. Back up to the
    // nearest preceding top-level division heading so the body region
    // includes it; without one, the section line itself starts the body.
    // The heading may be wrapped across a line break, hence \s+ between
    // marker words.
    let division_words = options
        .division_marker
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    let division_pattern = Regex::new(&format!(r"(?i)\b{division_words}\b"))
        .context("failed to compile division marker pattern")?;
    let body_start = division_pattern
        .find_iter(&text[..anchor_start])
        .last()
        .map(|found| found.start())
        .unwrap_or(anchor_start);

    if body_start <= toc_start {
        bail!(
            "table-of-contents marker (offset {toc_start}) does not precede body start (offset {body_start})"
        );
    }

    Ok(Anchors {
        toc_start,
        body_start,
    })
}
