use std::collections::BTreeMap;

use super::*;
use super::resolve::{HeadingSource, resolve_heading};
use super::segment::RawSection;
use super::{anchors, assemble, segment, toc};

use crate::error::ExtractError;
use crate::model::{SectionId, SectionRecord};

fn id(raw: &str) -> SectionId {
    raw.parse().unwrap()
}

fn test_options() -> ExtractOptions {
    ExtractOptions {
        doc_id: "test-doc".to_string(),
        title: "Test Document".to_string(),
        toc_marker: "ARRANGEMENT OF SECTIONS".to_string(),
        body_anchor: r"(?m)^\s*1\.\s+Alpha\s+is\b".to_string(),
        division_marker: "CHAPTER I".to_string(),
        max_section_numeric: 500,
        min_header_count: 3,
        first_line_heading_max_chars: 60,
        fragment_max_chars: 25,
        fragment_keep_ids: vec!["9".to_string()],
    }
}

fn raw_section(raw_id: &str, inline: &str, body: &str) -> RawSection {
    RawSection {
        id: id(raw_id),
        inline: inline.to_string(),
        body: body.to_string(),
    }
}

fn record(raw_id: &str, text: &str) -> SectionRecord {
    let section_id = id(raw_id);
    SectionRecord {
        chunk_id: section_id.chunk_id(),
        section_number: section_id.to_string(),
        heading: None,
        text: text.to_string(),
    }
}

#[test]
fn section_id_prefix_parsing_follows_the_identifier_grammar() {
    let (parsed, rest) = SectionId::take_prefix("38E. Something").unwrap();
    assert_eq!(parsed, id("38E"));
    assert_eq!(rest, ". Something");

    let (parsed, rest) = SectionId::take_prefix("212A").unwrap();
    assert_eq!(parsed, id("212A"));
    assert_eq!(rest, "");

    // Four letters is a word, not an identifier.
    assert!(SectionId::take_prefix("12ABCD.").is_none());
    assert!(SectionId::take_prefix("No digits").is_none());
    assert!(SectionId::take_prefix("99999999999999999999.").is_none());
}

#[test]
fn chunk_id_is_deterministic_and_collision_free() {
    let twelve = id("12");
    let twelve_a = id("12A");

    assert_eq!(twelve.chunk_id(), "sec-12");
    assert_eq!(twelve_a.chunk_id(), "sec-12A");
    assert_eq!(twelve.chunk_id(), twelve.chunk_id());
    assert_ne!(twelve.chunk_id(), twelve_a.chunk_id());
}

#[test]
fn section_ids_order_by_numeric_base_then_suffix() {
    let mut ids = vec![id("119A"), id("2"), id("119"), id("10"), id("2A")];
    ids.sort();

    let rendered: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
    assert_eq!(rendered, vec!["2", "2A", "10", "119", "119A"]);
}

#[test]
fn normalize_rejoins_hyphenated_line_breaks() {
    assert_eq!(normalize_text("con-\nstitution"), "constitution");
    // Hyphen before a non-word character stays put.
    assert_eq!(normalize_text("word-\n (note)"), "word-\n (note)");
}

#[test]
fn normalize_unifies_line_endings_and_trailing_whitespace() {
    assert_eq!(normalize_text("a\r\nb\rc"), "a\nb\nc");
    assert_eq!(normalize_text("line  \t\nnext"), "line\nnext");
}

#[test]
fn normalize_collapses_blank_line_runs() {
    assert_eq!(normalize_text("a\n\n\n\n\nb"), "a\n\nb");
    assert_eq!(normalize_text("a\n\nb"), "a\n\nb");
}

#[test]
fn boilerplate_lines_are_recognized_case_insensitively() {
    let filter = BoilerplateFilter::new().unwrap();

    assert!(filter.is_boilerplate_line("LAWS OF GUYANA"));
    assert!(filter.is_boilerplate_line("  laws of guyana"));
    assert!(filter.is_boilerplate_line("Cap. 1:01"));
    assert!(filter.is_boilerplate_line(
        "CONSTITUTION OF THE CO-OPERATIVE REPUBLIC OF GUYANA"
    ));
    assert!(filter.is_boilerplate_line("CONSTITUTION OF THE COOPERATIVE REPUBLIC OF GUYANA"));
    assert!(filter.is_boilerplate_line("L.R.O. 1/2012"));
    assert!(filter.is_boilerplate_line("  143  "));

    assert!(!filter.is_boilerplate_line("143. Protection of the law"));
    assert!(!filter.is_boilerplate_line("The laws of Guyana provide"));
}

#[test]
fn boilerplate_strip_drops_lines_and_collapses_gaps() {
    let filter = BoilerplateFilter::new().unwrap();
    let stripped = filter.strip("first\nLAWS OF GUYANA\n42\n\nsecond");
    assert_eq!(stripped, "first\n\nsecond");
}

#[test]
fn anchors_delimit_toc_and_body_regions() {
    let text = "Frontmatter to discard.\nARRANGEMENT OF SECTIONS\n1. The state\n2. Rights\nCHAPTER I\nTHE STATE\n1. Alpha is a sovereign state.\nMore body.";
    let options = test_options();

    let anchors = anchors::locate_anchors(text, &options).unwrap();
    assert!(text[anchors.toc_start..].starts_with("ARRANGEMENT OF SECTIONS"));
    assert!(text[anchors.body_start..].starts_with("CHAPTER I"));
    assert!(anchors.toc_start < anchors.body_start);
}

#[test]
fn body_start_falls_back_to_the_section_anchor_without_a_division() {
    let text =
        "ARRANGEMENT OF SECTIONS\n1. The state\n1. Alpha is a sovereign state.\nMore body.";
    let options = test_options();

    let anchors = anchors::locate_anchors(text, &options).unwrap();
    assert!(text[anchors.body_start..].starts_with("1. Alpha is"));
}

#[test]
fn missing_toc_marker_is_fatal() {
    let options = test_options();
    let err = anchors::locate_anchors("no listing here\n1. Alpha is a state.", &options)
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExtractError>(),
        Some(ExtractError::TocMarkerNotFound { .. })
    ));
}

#[test]
fn missing_body_anchor_is_fatal() {
    let options = test_options();
    let err =
        anchors::locate_anchors("ARRANGEMENT OF SECTIONS\n1. The state", &options).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExtractError>(),
        Some(ExtractError::BodyAnchorNotFound { .. })
    ));
}

#[test]
fn toc_headings_join_continuation_lines_and_drop_page_numbers() {
    let map = toc::parse_toc_headings(
        "1. The state\n2. Fundamental rights and freedoms\nof the individual 27\n3. Old provision\n",
    );

    assert_eq!(map.len(), 3);
    assert_eq!(
        map[&id("2")],
        "Fundamental rights and freedoms of the individual"
    );
    assert_eq!(map[&id("3")], "Old provision");
}

#[test]
fn toc_heading_that_is_only_a_number_is_kept() {
    let map = toc::parse_toc_headings("7. 42\n");
    assert_eq!(map[&id("7")], "42");
}

#[test]
fn toc_lines_before_the_first_header_are_ignored() {
    let map = toc::parse_toc_headings("PART ONE\nGeneral matters\n5. Real entry\n");
    assert_eq!(map.len(), 1);
    assert_eq!(map[&id("5")], "Real entry");
}

#[test]
fn segmenter_accepts_all_three_separators() {
    let filter = BoilerplateFilter::new().unwrap();
    let body = "1. Alpha is a state.\nAlpha body.\n2- Beta inline.\nBeta body.\n3: Gamma inline.\nGamma body.\n";

    let segmented = segment::segment_body(body, &filter, &test_options()).unwrap();
    let ids: Vec<String> = segmented
        .sections
        .iter()
        .map(|s| s.id.to_string())
        .collect();

    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(segmented.sections[0].inline, "Alpha is a state.");
    assert_eq!(segmented.sections[0].body, "Alpha body.");
    assert_eq!(segmented.sections[2].body, "Gamma body.");
}

#[test]
fn over_ceiling_headers_neither_emit_nor_split_chunks() {
    let filter = BoilerplateFilter::new().unwrap();
    let body = "1. Alpha is a state.\nAlpha body.\n2000. The millennium celebration was noted.\nStill alpha.\n2. Beta inline.\nBeta body.\n3. Gamma inline.\nGamma body.\n";

    let segmented = segment::segment_body(body, &filter, &test_options()).unwrap();
    let ids: Vec<String> = segmented
        .sections
        .iter()
        .map(|s| s.id.to_string())
        .collect();

    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(segmented.rejected_over_ceiling, 1);
    assert!(segmented.sections[0].body.contains("2000. The millennium"));
    assert!(segmented.sections[0].body.contains("Still alpha."));
}

#[test]
fn too_few_headers_is_fatal() {
    let filter = BoilerplateFilter::new().unwrap();
    let body = "1. Alpha is a state.\n2. Beta inline.\n";

    let err = segment::segment_body(body, &filter, &test_options()).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::InsufficientHeadings {
            found: 2,
            required: 3
        }
    ));
}

#[test]
fn boilerplate_is_restripped_inside_chunks() {
    let filter = BoilerplateFilter::new().unwrap();
    let body = "1. Alpha is a state.\nAlpha body.\nLAWS OF GUYANA\nAlpha continues.\n2. Beta.\nBeta body.\n3. Gamma.\nGamma body.\n";

    let segmented = segment::segment_body(body, &filter, &test_options()).unwrap();
    assert_eq!(segmented.sections[0].body, "Alpha body.\nAlpha continues.");
}

#[test]
fn inline_text_with_empty_chunk_becomes_the_section_text() {
    let mut toc_map = BTreeMap::new();
    toc_map.insert(id("146"), "A heading that must lose".to_string());
    let section = raw_section("146", "[Repealed by Act 5 of 1999.]", "");

    let resolved = resolve_heading(&section, &toc_map, &test_options());

    assert_eq!(resolved.heading, None);
    assert_eq!(resolved.text, "[Repealed by Act 5 of 1999.]");
    assert_eq!(resolved.source, HeadingSource::Inline);
}

#[test]
fn short_first_line_is_promoted_to_heading() {
    let toc_map = BTreeMap::new();
    let section = raw_section(
        "2",
        "",
        "Protection of right to life\n(1) No person shall be deprived of life intentionally.",
    );

    let resolved = resolve_heading(&section, &toc_map, &test_options());

    assert_eq!(resolved.heading.as_deref(), Some("Protection of right to life"));
    assert_eq!(
        resolved.text,
        "(1) No person shall be deprived of life intentionally."
    );
    assert_eq!(resolved.source, HeadingSource::FirstLine);
}

#[test]
fn clause_marker_first_line_is_not_promoted() {
    let mut toc_map = BTreeMap::new();
    toc_map.insert(id("2"), "Listing heading".to_string());
    let section = raw_section("2", "", "(1) Short clause.\nSecond line of the clause.");

    let resolved = resolve_heading(&section, &toc_map, &test_options());

    assert_eq!(resolved.heading.as_deref(), Some("Listing heading"));
    assert!(resolved.text.starts_with("(1) Short clause."));
    assert_eq!(resolved.source, HeadingSource::TableOfContents);
}

#[test]
fn long_first_line_is_not_promoted() {
    let toc_map = BTreeMap::new();
    let section = raw_section(
        "2",
        "",
        "This opening line runs far past the promotion threshold for headings.\nBody follows.",
    );

    let resolved = resolve_heading(&section, &toc_map, &test_options());

    assert_eq!(resolved.heading, None);
    assert!(resolved.text.starts_with("This opening line"));
    assert_eq!(resolved.source, HeadingSource::None);
}

#[test]
fn single_line_chunk_keeps_its_text_and_uses_the_listing_heading() {
    let mut toc_map = BTreeMap::new();
    toc_map.insert(id("3"), "Continuity".to_string());
    let section = raw_section("3", "", "One line only.");

    let resolved = resolve_heading(&section, &toc_map, &test_options());

    assert_eq!(resolved.heading.as_deref(), Some("Continuity"));
    assert_eq!(resolved.text, "One line only.");
    assert_eq!(resolved.source, HeadingSource::TableOfContents);
}

#[test]
fn empty_chunk_without_inline_text_stays_empty() {
    let toc_map = BTreeMap::new();
    let section = raw_section("8", "", "");

    let resolved = resolve_heading(&section, &toc_map, &test_options());

    assert_eq!(resolved.heading, None);
    assert_eq!(resolved.text, "");
    assert_eq!(resolved.source, HeadingSource::None);
}

#[test]
fn dedupe_keeps_the_longest_chunk_and_sorts_by_identifier() {
    let sections = vec![
        raw_section("5", "", "short."),
        raw_section("3", "", "gamma text."),
        raw_section("5", "", "a much longer body text."),
        raw_section("5", "", "mid length."),
    ];

    let deduped = assemble::dedupe_sections(sections);
    let ids: Vec<String> = deduped.iter().map(|s| s.id.to_string()).collect();

    assert_eq!(ids, vec!["3", "5"]);
    assert_eq!(deduped[1].body, "a much longer body text.");
}

#[test]
fn dedupe_ties_keep_the_first_encountered() {
    let sections = vec![
        raw_section("5", "first", "same size"),
        raw_section("5", "second", "nine ch.."),
    ];

    let deduped = assemble::dedupe_sections(sections);
    assert_eq!(deduped.len(), 1);
    assert_eq!(deduped[0].inline, "first");
}

#[test]
fn trailing_fragments_merge_into_the_previous_record() {
    let options = test_options();
    let mut records = vec![
        record("1", "A body long enough to not be a fragment."),
        record("2", "Tail frag."),
        record("3", "Another full length body that stands on its own."),
    ];

    let merged = assemble::merge_trailing_fragments(&mut records, &options);

    assert_eq!(merged, 1);
    assert!(records[0].text.ends_with("\nTail frag."));
    assert_eq!(
        records[1].text,
        "[See previous section text; extraction produced fragment: 'Tail frag.']"
    );
    assert_eq!(
        records[2].text,
        "Another full length body that stands on its own."
    );
}

#[test]
fn keep_listed_identifiers_are_never_merged() {
    let options = test_options();
    let mut records = vec![
        record("8", "A body long enough to not be a fragment."),
        record("9", "Tiny but real."),
    ];

    let merged = assemble::merge_trailing_fragments(&mut records, &options);

    assert_eq!(merged, 0);
    assert_eq!(records[1].text, "Tiny but real.");
}

#[test]
fn fragments_without_a_sentence_terminator_are_left_alone() {
    let options = test_options();
    let mut records = vec![
        record("1", "A body long enough to not be a fragment."),
        record("2", "Tiny tail"),
    ];

    assert_eq!(assemble::merge_trailing_fragments(&mut records, &options), 0);
    assert_eq!(records[1].text, "Tiny tail");
}

#[test]
fn diagnostics_find_duplicates_empties_and_gaps() {
    let records = vec![
        record("1", "Alpha text."),
        record("2", "Beta text."),
        record("4", "Delta text."),
        record("12A", "Lettered text."),
        record("12A", "Duplicate lettered text."),
        record("7", "   "),
    ];

    let diagnostics = Diagnostics::compute(&records);

    assert_eq!(diagnostics.section_count, 6);
    assert_eq!(diagnostics.duplicate_chunk_ids, vec!["sec-12A".to_string()]);
    assert_eq!(diagnostics.empty_chunk_ids, vec!["sec-7".to_string()]);
    assert_eq!(diagnostics.numeric_range, Some((1, 7)));
    assert_eq!(diagnostics.numeric_gaps, vec![(2, 4), (4, 7)]);
    assert_eq!(diagnostics.shortest.first().unwrap().chunk_id, "sec-7");
}

fn sample_pages() -> Vec<String> {
    vec![
        "LAWS OF GUYANA\nPreamble to be discarded.\nARRANGEMENT OF SECTIONS\n1. The state\n2. Protection of right to life\n3. Old provision\n4. Continuity\nof laws 12\n5. Supremacy of constitution\n"
            .to_string(),
        "CHAPTER I\nTHE STATE\n1. Alpha is an indivisible state.\nIt continues here with more alpha text.\n2. Protection of right to life\n(1) No person shall be deprived of life intentionally.\n(2) Except in execution of a sentence of a court.\n"
            .to_string(),
        "LAWS OF GUYANA\n3.  [Repealed by Act 5 of 1999.]\n4.\nContinuity of laws\nAll laws in force before this date continue in force after it.\n5. Supremacy clause text long enough to stand alone.\n"
            .to_string(),
    ]
}

#[test]
fn pipeline_emits_sorted_unique_records_with_resolved_headings() {
    let options = test_options();
    let outcome = run_pipeline(&sample_pages(), &options).unwrap();
    let sections = &outcome.document.sections;

    let numbers: Vec<&str> = sections.iter().map(|s| s.section_number.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2", "3", "4", "5"]);

    assert_eq!(sections[0].heading.as_deref(), Some("The state"));
    assert_eq!(sections[0].text, "It continues here with more alpha text.");

    assert_eq!(
        sections[1].heading.as_deref(),
        Some("Protection of right to life")
    );
    assert!(sections[1].text.starts_with("(1) No person"));
    assert!(sections[1].text.contains("(2) Except in execution"));

    // Inline-as-text precedence: the listing heading is deliberately unused.
    assert_eq!(sections[2].heading, None);
    assert_eq!(sections[2].text, "[Repealed by Act 5 of 1999.]");

    // First-line promotion, with the listing continuation entry as backup.
    assert_eq!(sections[3].heading.as_deref(), Some("Continuity of laws"));
    assert_eq!(
        sections[3].text,
        "All laws in force before this date continue in force after it."
    );

    assert_eq!(sections[4].heading, None);
    assert_eq!(
        sections[4].text,
        "Supremacy clause text long enough to stand alone."
    );

    assert_eq!(outcome.counts.toc_headings, 5);
    assert_eq!(outcome.counts.headers_accepted, 5);
    assert_eq!(outcome.counts.fragments_merged, 0);
    assert_eq!(outcome.counts.inline_text_sections, 2);
    assert_eq!(outcome.counts.first_line_headings, 1);
    assert_eq!(outcome.counts.toc_headings_applied, 2);
}

#[test]
fn pipeline_output_is_idempotent() {
    let options = test_options();
    let first = run_pipeline(&sample_pages(), &options).unwrap();
    let second = run_pipeline(&sample_pages(), &options).unwrap();

    assert_eq!(first.document, second.document);
}

#[test]
fn toc_identifiers_with_body_chunks_resolve_headings_unless_inline_won() {
    let options = test_options();
    let outcome = run_pipeline(&sample_pages(), &options).unwrap();

    for section in &outcome.document.sections {
        let inline_won = section.heading.is_none()
            && (section.text.starts_with('[') || section.section_number == "5");
        assert!(
            section.heading.is_some() || inline_won,
            "section {} lost its heading",
            section.section_number
        );
    }
}
