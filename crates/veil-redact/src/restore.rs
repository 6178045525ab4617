//! Restorer — the exact inverse of the transformer.

use std::collections::HashSet;

use veil_core::{Error, MismatchReason, Result};

use crate::mapper::{RedactionMap, PLACEHOLDER_RE};

/// Substitute every mapped placeholder in `redacted` with its original text.
///
/// Placeholder-shaped tokens listed in `map.preserved` are left untouched;
/// any other token missing from the map fails the whole restore.
pub fn restore(redacted: &str, map: &RedactionMap) -> Result<String> {
    restore_with(redacted, map, false)
}

/// Like [`restore`], and additionally fails when a map entry is never
/// referenced by the text.
pub fn restore_strict(redacted: &str, map: &RedactionMap) -> Result<String> {
    restore_with(redacted, map, true)
}

fn restore_with(redacted: &str, map: &RedactionMap, strict: bool) -> Result<String> {
    let mut restored = String::with_capacity(redacted.len());
    let mut used: HashSet<&str> = HashSet::new();
    let mut last = 0;

    for token in PLACEHOLDER_RE.find_iter(redacted) {
        let placeholder = token.as_str();
        match map.entries.get(placeholder) {
            Some(entry) => {
                restored.push_str(&redacted[last..token.start()]);
                restored.push_str(&entry.original_text);
                last = token.end();
                used.insert(placeholder);
            }
            None if map.preserved.contains(placeholder) => {}
            None => {
                return Err(Error::RestoreMismatch {
                    placeholder: placeholder.to_string(),
                    reason: MismatchReason::Unknown,
                });
            }
        }
    }
    restored.push_str(&redacted[last..]);

    if strict {
        if let Some(unused) = map.entries.keys().find(|k| !used.contains(k.as_str())) {
            return Err(Error::RestoreMismatch {
                placeholder: unused.clone(),
                reason: MismatchReason::Unused,
            });
        }
    }

    Ok(restored)
}
