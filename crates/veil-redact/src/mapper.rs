//! Redaction mapper — content-addressed placeholder assignment.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::patterns::{pattern_for, PiiCategory, Severity};
use crate::scanner::Match;

/// Every placeholder the mapper can emit, e.g. `[EMAIL_1]` or
/// `[PHONE_2 ******4567]`.
pub static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[A-Z]+(?:_[A-Z]+)*_\d+(?: \*+\d{1,4})?\]").unwrap());

/// What a placeholder stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionEntry {
    pub original_text: String,
    pub category: PiiCategory,
    /// Offsets of the first occurrence.
    #[serde(rename = "startOffset")]
    pub start: usize,
    #[serde(rename = "endOffset")]
    pub end: usize,
    /// How many spans share this placeholder.
    pub occurrences: usize,
}

/// Placeholder → original value, for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionMap {
    pub entries: BTreeMap<String, RedactionEntry>,
    /// Placeholder-shaped text that was already in the input. Never
    /// generated, left as-is on restore.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub preserved: BTreeSet<String>,
}

impl RedactionMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, placeholder: &str) -> Option<&RedactionEntry> {
        self.entries.get(placeholder)
    }

    /// Reverse lookup by original value.
    pub fn placeholder_for(&self, original: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.original_text == original)
            .map(|(placeholder, _)| placeholder.as_str())
    }
}

/// An accepted span with its placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub category: PiiCategory,
    pub original_text: String,
    #[serde(rename = "startOffset")]
    pub start: usize,
    #[serde(rename = "endOffset")]
    pub end: usize,
    pub severity: Severity,
    pub placeholder: String,
}

/// Assign placeholders to resolved spans (sorted by start) and build the map.
///
/// Counters run per label from 1 in order of first appearance. Identical
/// original text always receives the same placeholder; the key is the exact
/// text because the map must restore every occurrence byte for byte.
pub fn assign_placeholders(text: &str, spans: Vec<Match>) -> (Vec<Detection>, RedactionMap) {
    let mut map = RedactionMap {
        entries: BTreeMap::new(),
        preserved: PLACEHOLDER_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
    };
    let mut assigned: HashMap<String, String> = HashMap::new();
    let mut counters: HashMap<&'static str, usize> = HashMap::new();
    let mut detections = Vec::with_capacity(spans.len());

    for span in spans {
        let placeholder = match assigned.get(&span.original_text) {
            Some(existing) => {
                if let Some(entry) = map.entries.get_mut(existing) {
                    entry.occurrences += 1;
                }
                existing.clone()
            }
            None => {
                let placeholder = next_placeholder(&span, &mut counters, &map);
                map.entries.insert(
                    placeholder.clone(),
                    RedactionEntry {
                        original_text: span.original_text.clone(),
                        category: span.category,
                        start: span.start,
                        end: span.end,
                        occurrences: 1,
                    },
                );
                assigned.insert(span.original_text.clone(), placeholder.clone());
                placeholder
            }
        };

        detections.push(Detection {
            category: span.category,
            original_text: span.original_text,
            start: span.start,
            end: span.end,
            severity: span.severity,
            placeholder,
        });
    }

    (detections, map)
}

/// Next free placeholder for the span's label, skipping any that collide
/// with text already present in the input.
fn next_placeholder(
    span: &Match,
    counters: &mut HashMap<&'static str, usize>,
    map: &RedactionMap,
) -> String {
    let pattern = pattern_for(span.category);
    let counter = counters.entry(span.category.label()).or_insert(0);
    loop {
        *counter += 1;
        let candidate = pattern.placeholder(*counter, &span.original_text);
        if !map.preserved.contains(&candidate) && !map.entries.contains_key(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(text: &str, start: usize) -> Match {
        Match {
            category: PiiCategory::Email,
            original_text: text.to_string(),
            start,
            end: start + text.len(),
            severity: Severity::High,
        }
    }

    #[test]
    fn test_same_value_same_placeholder() {
        let text = "Email john@example.com twice: john@example.com";
        let spans = vec![email("john@example.com", 6), email("john@example.com", 30)];
        let (detections, map) = assign_placeholders(text, spans);
        assert_eq!(detections[0].placeholder, "[EMAIL_1]");
        assert_eq!(detections[1].placeholder, "[EMAIL_1]");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("[EMAIL_1]").unwrap().occurrences, 2);
        assert_eq!(map.placeholder_for("john@example.com"), Some("[EMAIL_1]"));
    }

    #[test]
    fn test_counters_are_per_label() {
        let text = "a@x.io b@x.io 10.0.0.1";
        let spans = vec![
            email("a@x.io", 0),
            email("b@x.io", 7),
            Match {
                category: PiiCategory::IpAddress,
                original_text: "10.0.0.1".into(),
                start: 14,
                end: 22,
                severity: Severity::Medium,
            },
        ];
        let (detections, _) = assign_placeholders(text, spans);
        let placeholders: Vec<_> = detections.iter().map(|d| d.placeholder.as_str()).collect();
        assert_eq!(placeholders, vec!["[EMAIL_1]", "[EMAIL_2]", "[IP_ADDRESS_1]"]);
    }

    #[test]
    fn test_existing_placeholder_text_is_skipped() {
        let text = "[EMAIL_1] was sent to a@x.io";
        let (detections, map) = assign_placeholders(text, vec![email("a@x.io", 22)]);
        assert_eq!(detections[0].placeholder, "[EMAIL_2]");
        assert!(map.preserved.contains("[EMAIL_1]"));
    }

    #[test]
    fn test_placeholder_shape_matches_generated_forms() {
        for form in ["[EMAIL_1]", "[IP_ADDRESS_12]", "[CARD_3 ************9010]", "[PHONE_1 ******4567]"] {
            let m = PLACEHOLDER_RE.find(form).unwrap();
            assert_eq!(m.as_str(), form);
        }
        assert!(PLACEHOLDER_RE.find("[not a token]").is_none());
    }
}
