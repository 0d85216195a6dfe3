use anyhow::{Context, Result};
use regex::Regex;

/// Repairs line-wrap artifacts left behind by the PDF text layer: rejoins
/// hyphenated word breaks, unifies line endings, strips trailing whitespace
/// and collapses runs of blank lines down to a single blank line.
pub fn normalize_text(input: &str) -> String {
    let rejoined = rejoin_hyphenated_breaks(input);
    let unified = rejoined.replace("\r\n", "\n").replace('\r', "\n");
    let stripped = unified
        .split('\n')
        .map(|line| line.trim_end_matches([' ', '\t']))
        .collect::<Vec<_>>()
        .join("\n");
    collapse_blank_runs(&stripped)
}

/// `word-\nend` becomes `wordend`; the hyphen only disappears when a word
/// character follows the break.
fn rejoin_hyphenated_breaks(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find("-\n") {
        let after = &rest[pos + 2..];
        let continues_word = after
            .chars()
            .next()
            .map(|c| c.is_alphanumeric() || c == '_')
            .unwrap_or(false);

        if continues_word {
            out.push_str(&rest[..pos]);
        } else {
            out.push_str(&rest[..pos + 2]);
        }
        rest = after;
    }

    out.push_str(rest);
    out
}

fn collapse_blank_runs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut newlines = 0usize;

    for c in input.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push('\n');
            }
        } else {
            newlines = 0;
            out.push(c);
        }
    }

    out
}

/// Drops running page headers, footers and page-number-only lines. The
/// pattern set is the fixed boilerplate of the source document: the
/// jurisdiction masthead, chapter stamps, the title restatement in either
/// spelling, revision-office stamps.
pub struct BoilerplateFilter {
    pattern: Regex,
}

impl BoilerplateFilter {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(
            r"(?i)^\s*(?:LAWS OF GUYANA|Cap\.\s*\d+:\d+|CONSTITUTION OF THE CO-?OPERATIVE REPUBLIC OF GUYANA|L\.R\.O\..*|\d+)\s*$",
        )
        .context("failed to compile boilerplate line pattern")?;

        Ok(Self { pattern })
    }

    pub fn is_boilerplate_line(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Reassembles `text` without boilerplate lines, collapsing any blank
    /// runs the removals leave behind.
    pub fn strip(&self, text: &str) -> String {
        let kept = text
            .lines()
            .filter(|line| !self.is_boilerplate_line(line))
            .collect::<Vec<_>>()
            .join("\n");
        collapse_blank_runs(&kept)
    }
}
