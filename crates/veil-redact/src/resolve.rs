//! Overlap resolution — greedy sort + sweep over candidate spans.

use std::collections::{BTreeMap, HashSet};

use crate::scanner::Match;

/// Keep a pairwise non-overlapping subset of `matches`, sorted by start.
///
/// Candidates are ordered by start ascending, then length descending, then
/// registry order; a candidate is kept only if it begins at or after the end
/// of the last kept one.
pub fn resolve(mut matches: Vec<Match>) -> Vec<Match> {
    matches.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.category.cmp(&b.category))
    });

    let mut accepted = Vec::with_capacity(matches.len());
    let mut last_end = 0;
    for m in matches {
        if m.start >= last_end {
            last_end = m.end;
            accepted.push(m);
        }
    }
    accepted
}

/// Extend `spans` with every further exact occurrence of an accepted value
/// that does not intersect an existing span. Repeats inherit the category
/// of the first sighting, so a value found once by context is redacted
/// everywhere it appears.
pub fn cover_repeats(text: &str, spans: Vec<Match>) -> Vec<Match> {
    let mut by_start: BTreeMap<usize, Match> = spans.into_iter().map(|m| (m.start, m)).collect();

    let mut seen = HashSet::new();
    let mut sightings: Vec<Match> = by_start.values().cloned().collect();
    sightings.retain(|m| seen.insert(m.original_text.clone()));

    for first in sightings {
        let needle = first.original_text.as_str();
        for (start, _) in text.match_indices(needle) {
            let end = start + needle.len();
            let blocked = by_start
                .range(..end)
                .next_back()
                .map(|(_, prev)| prev.overlaps(start, end))
                .unwrap_or(false);
            if !blocked {
                by_start.insert(
                    start,
                    Match {
                        start,
                        end,
                        ..first.clone()
                    },
                );
            }
        }
    }

    by_start.into_values().collect()
}
