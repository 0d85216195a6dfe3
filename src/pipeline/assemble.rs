use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::model::{SectionId, SectionRecord};

use super::ExtractOptions;
use super::segment::RawSection;

/// Collapses repeated identifiers down to one chunk each. Extraction can
/// yield the same section twice (cross-references that look like headers,
/// repeated runs across page boundaries); the chunk with the longest
/// trimmed body wins, ties keep the first encountered. Output is sorted by
/// identifier.
pub fn dedupe_sections(sections: Vec<RawSection>) -> Vec<RawSection> {
    let mut best: BTreeMap<SectionId, RawSection> = BTreeMap::new();

    for section in sections {
        let longer_than_existing = best
            .get(&section.id)
            .map(|existing| section.body.trim().len() > existing.body.trim().len());

        match longer_than_existing {
            Some(false) => {
                debug!(identifier = %section.id, "dropped shorter duplicate chunk");
            }
            Some(true) => {
                debug!(identifier = %section.id, "replaced duplicate chunk with longer text");
                best.insert(section.id.clone(), section);
            }
            None => {
                best.insert(section.id.clone(), section);
            }
        }
    }

    best.into_values().collect()
}

/// Reattaches short trailing fragments to the section they were split off
/// from. A fragment record stays in the list under its own identifier, but
/// its text becomes a pointer note so consumers can tell redirect from
/// substance. Every merge is logged; the keep-list exempts sections known
/// to be legitimately short.
pub fn merge_trailing_fragments(records: &mut [SectionRecord], options: &ExtractOptions) -> usize {
    let mut merged = 0usize;

    for index in 1..records.len() {
        let fragment = records[index].text.trim().to_string();
        if fragment.is_empty()
            || fragment.chars().count() >= options.fragment_max_chars
            || !fragment.ends_with('.')
            || options
                .fragment_keep_ids
                .contains(&records[index].section_number)
        {
            continue;
        }

        info!(
            section = %records[index].section_number,
            previous = %records[index - 1].section_number,
            fragment = %fragment,
            "reattached trailing fragment to previous section"
        );

        let previous = &mut records[index - 1];
        previous.text = format!("{}\n{}", previous.text.trim_end(), fragment)
            .trim()
            .to_string();

        records[index].text =
            format!("[See previous section text; extraction produced fragment: '{fragment}']");
        merged += 1;
    }

    merged
}
