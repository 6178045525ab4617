//! Redactor — scan, redact and restore in one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use veil_core::{EngineConfig, Error, Result};

use crate::mapper::{assign_placeholders, Detection, RedactionMap};
use crate::patterns::PiiCategory;
use crate::resolve::{cover_repeats, resolve};
use crate::restore;
use crate::scanner::{self, ScanOptions};
use crate::score::{detection_stats, PrivacyReport};
use crate::transform::apply_redaction;

/// Output of one scan. Detections are sorted by start offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub redacted_text: String,
    pub redaction_map: RedactionMap,
    pub detections: Vec<Detection>,
    pub detection_stats: BTreeMap<PiiCategory, usize>,
    pub pii_detected: bool,
}

impl ScanResult {
    pub fn empty() -> Self {
        Self {
            redacted_text: String::new(),
            redaction_map: RedactionMap::default(),
            detections: Vec::new(),
            detection_stats: BTreeMap::new(),
            pii_detected: false,
        }
    }

    pub fn report(&self) -> PrivacyReport {
        PrivacyReport::from_detections(&self.detections)
    }
}

/// Stateless pipeline facade. Cheap to clone and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Redactor {
    config: EngineConfig,
}

impl Redactor {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Options used when a caller does not supply its own.
    pub fn default_options(&self) -> ScanOptions {
        ScanOptions {
            include_names: self.config.include_names,
            include_addresses: self.config.include_addresses,
        }
    }

    /// Detect PII in `text` and replace it with placeholders.
    pub fn scan(&self, text: &str, options: &ScanOptions) -> Result<ScanResult> {
        self.check_size(text)?;
        if text.is_empty() {
            return Ok(ScanResult::empty());
        }

        let candidates = scanner::scan(text, options);
        let candidate_count = candidates.len();
        let spans = cover_repeats(text, resolve(candidates));
        let (detections, redaction_map) = assign_placeholders(text, spans);
        let redacted_text = apply_redaction(text, &detections);
        let stats = detection_stats(&detections);

        debug!(
            "Scanned {} bytes: {} candidates, {} detections, {} placeholders",
            text.len(),
            candidate_count,
            detections.len(),
            redaction_map.len()
        );

        Ok(ScanResult {
            redacted_text,
            redaction_map,
            pii_detected: !detections.is_empty(),
            detections,
            detection_stats: stats,
        })
    }

    /// Restore redacted text. Strict when the engine is configured so.
    pub fn restore(&self, redacted: &str, map: &RedactionMap) -> Result<String> {
        self.restore_with(redacted, map, self.config.strict_restore)
    }

    pub fn restore_strict(&self, redacted: &str, map: &RedactionMap) -> Result<String> {
        self.restore_with(redacted, map, true)
    }

    /// Redacted text may outgrow the scan limit by however much its
    /// placeholders are longer than the values they stand for.
    pub fn restore_with(&self, redacted: &str, map: &RedactionMap, strict: bool) -> Result<String> {
        let growth: usize = map
            .entries
            .iter()
            .map(|(placeholder, entry)| {
                placeholder
                    .len()
                    .saturating_sub(entry.original_text.len())
                    .saturating_mul(entry.occurrences)
            })
            .fold(0, usize::saturating_add);
        self.check_size_within(redacted, self.config.max_input_bytes.saturating_add(growth))?;
        if strict {
            restore::restore_strict(redacted, map)
        } else {
            restore::restore(redacted, map)
        }
    }

    /// Score `text` without handing back the redaction.
    pub fn assess(&self, text: &str, options: &ScanOptions) -> Result<PrivacyReport> {
        Ok(self.scan(text, options)?.report())
    }

    fn check_size(&self, text: &str) -> Result<()> {
        self.check_size_within(text, self.config.max_input_bytes)
    }

    fn check_size_within(&self, text: &str, max: usize) -> Result<()> {
        if text.len() > max {
            return Err(Error::InputTooLarge {
                len: text.len(),
                max,
            });
        }
        Ok(())
    }
}
