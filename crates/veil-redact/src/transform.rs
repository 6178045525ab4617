//! Text transformer — splices placeholders into the original text.

use tracing::warn;

use crate::mapper::Detection;

/// Replace every detection's span with its placeholder.
///
/// Spans are applied rightmost first so earlier offsets stay valid.
/// Detections must be pairwise non-overlapping; a span that does not fit
/// the text is skipped.
pub fn apply_redaction(text: &str, detections: &[Detection]) -> String {
    let mut ordered: Vec<&Detection> = detections.iter().collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    let mut redacted = text.to_string();
    let mut limit = text.len();
    for detection in ordered {
        if detection.end > limit || text.get(detection.start..detection.end).is_none() {
            warn!(
                "Skipping {} span {}..{} outside text or overlapping",
                detection.category, detection.start, detection.end
            );
            continue;
        }
        redacted.replace_range(detection.start..detection.end, &detection.placeholder);
        limit = detection.start;
    }
    redacted
}
