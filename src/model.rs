use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Maximum length of the alphabetic suffix of a section identifier (`38E`,
/// `212A`). Anything longer is not a section number.
const MAX_SUFFIX_LEN: usize = 3;

/// Section identifier: positive numeric base plus an optional short
/// uppercase suffix. Ordered by numeric base, then suffix; a bare number
/// sorts before any lettered variant of the same base.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId {
    pub numeric: u32,
    pub suffix: String,
}

impl SectionId {
    /// Parses a section identifier from the start of `input`, returning the
    /// identifier and the unconsumed remainder. Returns `None` when `input`
    /// does not start with the `<digits><0-3 uppercase letters>` grammar.
    pub fn take_prefix(input: &str) -> Option<(SectionId, &str)> {
        let digit_end = input
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(input.len());
        if digit_end == 0 {
            return None;
        }

        let numeric: u32 = input[..digit_end].parse().ok()?;

        let mut suffix = String::new();
        let mut rest = &input[digit_end..];
        while let Some(c) = rest.chars().next() {
            if !c.is_ascii_uppercase() || suffix.len() >= MAX_SUFFIX_LEN {
                break;
            }
            suffix.push(c);
            rest = &rest[1..];
        }

        // A fourth uppercase letter means this was a word, not an identifier.
        if suffix.len() == MAX_SUFFIX_LEN
            && rest
                .chars()
                .next()
                .map(|c| c.is_ascii_uppercase())
                .unwrap_or(false)
        {
            return None;
        }

        Some((SectionId { numeric, suffix }, rest))
    }

    /// Deterministic, collision-free record identifier: the uppercased
    /// identifier stripped of non-alphanumerics behind a fixed prefix.
    pub fn chunk_id(&self) -> String {
        let compact: String = self
            .to_string()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        format!("sec-{compact}")
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.numeric, self.suffix)
    }
}

impl FromStr for SectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.trim().to_ascii_uppercase();
        match SectionId::take_prefix(&folded) {
            Some((id, rest)) if rest.is_empty() => Ok(id),
            _ => Err(format!("invalid section identifier: '{s}'")),
        }
    }
}

impl Serialize for SectionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SectionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub chunk_id: String,
    pub section_number: String,
    pub heading: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstitutionDocument {
    pub doc_id: String,
    pub title: String,
    pub sections: Vec<SectionRecord>,
}

/// Secondary artifact: first body page on which each known section header
/// appears. Key layout matches the consumer app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageIndexFile {
    pub pdf_path: String,
    pub page_count: usize,
    pub sections: BTreeMap<SectionId, usize>,
}
