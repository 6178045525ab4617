//! Scanner — runs every active pattern over the text and keeps the
//! candidates their validators accept.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::patterns::{list_patterns, PiiCategory, PiiPattern, Severity};

/// Switches for the heuristic, higher-false-positive categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanOptions {
    /// Contextual and standalone person names.
    pub include_names: bool,
    /// Street addresses and postcodes.
    pub include_addresses: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_names: true,
            include_addresses: true,
        }
    }
}

/// A validated candidate span. Offsets are UTF-8 byte offsets into the
/// scanned text and always fall on char boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub category: PiiCategory,
    pub original_text: String,
    #[serde(rename = "startOffset")]
    pub start: usize,
    #[serde(rename = "endOffset")]
    pub end: usize,
    pub severity: Severity,
}

impl Match {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Apply every enabled pattern to `text`.
///
/// Matches of one pattern never overlap each other; matches of different
/// patterns may, and are left for the resolver.
pub fn scan(text: &str, options: &ScanOptions) -> Vec<Match> {
    let mut matches = Vec::new();
    for pattern in list_patterns()
        .iter()
        .filter(|p| p.category.is_enabled(options))
    {
        scan_pattern(pattern, text, &mut matches);
    }
    matches
}

/// Byte offset of the char after the one starting at `pos`.
fn step_past(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

/// Validated span of the candidate at `pos` in `haystack`, with the end of
/// the whole match.
fn candidate_at(
    pattern: &PiiPattern,
    haystack: &str,
    pos: usize,
) -> Option<(usize, usize, Option<Match>)> {
    let caps = pattern.regex.captures_at(haystack, pos)?;
    let whole = caps.get(0)?;
    let span = (1..caps.len()).find_map(|i| caps.get(i)).unwrap_or(whole);
    if span.as_str().is_empty() {
        return Some((whole.start(), whole.end(), None));
    }

    let accepted = match pattern.validate(span.as_str()) {
        Ok(verdict) => verdict,
        Err(fault) => {
            trace!("Dropping {} candidate: {}", pattern.category, fault);
            false
        }
    };
    let found = accepted.then(|| Match {
        category: pattern.category,
        original_text: span.as_str().to_string(),
        start: span.start(),
        end: span.end(),
        severity: pattern.severity,
    });
    Some((whole.start(), whole.end(), found))
}

/// Longest accepted candidate starting at `start` once trailing
/// space-separated groups of the rejected match are cut off.
fn trimmed_candidate(
    pattern: &PiiPattern,
    text: &str,
    start: usize,
    end: usize,
) -> Option<(usize, Match)> {
    let cuts = text[start..end]
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, _)| start + i)
        .rev();
    for cut in cuts {
        if let Some((s, e, Some(found))) = candidate_at(pattern, &text[..cut], start) {
            if s == start {
                return Some((e, found));
            }
        }
    }
    None
}

fn scan_pattern(pattern: &PiiPattern, text: &str, out: &mut Vec<Match>) {
    let mut pos = 0;
    while pos <= text.len() {
        let Some((start, end, found)) = candidate_at(pattern, text, pos) else {
            break;
        };
        // A rejected candidate resumes one char later so a bad prefix
        // cannot hide a valid match inside the same run.
        let retry = step_past(text, start);

        let accepted = match found {
            Some(found) => Some((end, found)),
            None if pattern.trims_tail => trimmed_candidate(pattern, text, start, end),
            None => None,
        };
        match accepted {
            Some((end, found)) => {
                out.push(found);
                pos = end.max(retry);
            }
            None => pos = retry,
        }
    }
}
