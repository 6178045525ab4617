//! End-to-end properties of the redaction pipeline: exact restore, no
//! leakage, stable placeholders, disjoint spans.

use veil_redact::mapper::PLACEHOLDER_RE;
use veil_redact::{PiiCategory, Redactor, ScanOptions, ScanResult};

const REPORT: &str = "Reported by John Smith (john.smith@example.com, 020 7946 0958) on 15/03/2024. \
Card 4532 1234 5678 9010, NI AB 12 34 56 C, IBAN GB82 WEST 1234 5698 7654 32. \
He lives at 221 Baker Street, SW1A 1AA. Server 192.168.1.1 logged https://intranet.example.com/case/42. \
John Smith also emailed john.smith@example.com again.";

fn all_options() -> Vec<ScanOptions> {
    let mut combos = Vec::new();
    for include_names in [false, true] {
        for include_addresses in [false, true] {
            combos.push(ScanOptions {
                include_names,
                include_addresses,
            });
        }
    }
    combos
}

fn scan(text: &str, options: &ScanOptions) -> ScanResult {
    Redactor::default().scan(text, options).unwrap()
}

#[test]
fn test_round_trip_for_every_option_combination() {
    let redactor = Redactor::default();
    for options in all_options() {
        let result = scan(REPORT, &options);
        assert!(result.pii_detected);
        let restored = redactor
            .restore_strict(&result.redacted_text, &result.redaction_map)
            .unwrap();
        assert_eq!(restored, REPORT, "options {:?}", options);
    }
}

#[test]
fn test_no_recorded_original_survives() {
    for options in all_options() {
        let result = scan(REPORT, &options);
        for detection in &result.detections {
            assert!(
                !result.redacted_text.contains(&detection.original_text),
                "{} leaked with {:?}",
                detection.original_text,
                options
            );
        }
    }
}

#[test]
fn test_expected_categories_found() {
    let result = scan(REPORT, &ScanOptions::default());
    for category in [
        PiiCategory::Email,
        PiiCategory::Phone,
        PiiCategory::SpecificDate,
        PiiCategory::CreditCard,
        PiiCategory::NationalId,
        PiiCategory::Iban,
        PiiCategory::Address,
        PiiCategory::Postcode,
        PiiCategory::IpAddress,
        PiiCategory::Url,
        PiiCategory::PossibleName,
    ] {
        assert!(
            result.detection_stats.contains_key(&category),
            "missing {:?}",
            category
        );
    }
    // both sightings of the name and the email share a placeholder
    assert_eq!(result.redaction_map.placeholder_for("John Smith"), Some("[NAME_1]"));
    assert_eq!(result.redacted_text.matches("[NAME_1]").count(), 2);
    assert_eq!(result.redacted_text.matches("[EMAIL_1]").count(), 2);
}

#[test]
fn test_rescan_never_touches_placeholders() {
    for options in all_options() {
        let first = scan(REPORT, &options);
        let second = scan(&first.redacted_text, &options);
        let tokens: Vec<(usize, usize)> = PLACEHOLDER_RE
            .find_iter(&first.redacted_text)
            .map(|m| (m.start(), m.end()))
            .collect();
        for detection in &second.detections {
            assert!(
                tokens
                    .iter()
                    .all(|(s, e)| detection.end <= *s || detection.start >= *e),
                "{:?} touches a placeholder",
                detection
            );
        }
    }
}

#[test]
fn test_scan_is_deterministic() {
    let options = ScanOptions::default();
    assert_eq!(scan(REPORT, &options), scan(REPORT, &options));
}

#[test]
fn test_detections_are_disjoint_and_ordered() {
    let result = scan(REPORT, &ScanOptions::default());
    for pair in result.detections.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }
    for detection in &result.detections {
        assert_eq!(&REPORT[detection.start..detection.end], detection.original_text);
    }
}

#[test]
fn test_repeated_value_one_placeholder() {
    let result = scan(
        "Email john@example.com twice: john@example.com",
        &ScanOptions::default(),
    );
    assert_eq!(result.redacted_text, "Email [EMAIL_1] twice: [EMAIL_1]");
    assert_eq!(result.redaction_map.len(), 1);
}

#[test]
fn test_iban_before_currency_code_fully_redacted() {
    let text = "Pay ES91 2100 0418 4502 0005 1332 EUR now";
    let result = scan(text, &ScanOptions::default());
    assert_eq!(result.redacted_text, "Pay [IBAN_1] EUR now");
    let restored = Redactor::default()
        .restore_strict(&result.redacted_text, &result.redaction_map)
        .unwrap();
    assert_eq!(restored, text);
}

#[test]
fn test_checksum_failures_are_left_alone() {
    let result = scan(
        "Card 1234 5678 9012 3456 from 999.999.999.999",
        &ScanOptions::default(),
    );
    assert!(!result.pii_detected);
    assert_eq!(result.redacted_text, "Card 1234 5678 9012 3456 from 999.999.999.999");
}

#[test]
fn test_place_names_are_not_people() {
    let result = scan("Visit New York or United Kingdom", &ScanOptions::default());
    assert!(!result.detection_stats.contains_key(&PiiCategory::PossibleName));
    assert!(!result.detection_stats.contains_key(&PiiCategory::StandaloneName));
}

#[test]
fn test_empty_input() {
    let result = scan("", &ScanOptions::default());
    assert!(!result.pii_detected);
    assert!(result.detections.is_empty());
    assert_eq!(result.redacted_text, "");
}

#[test]
fn test_literal_placeholder_text_round_trips() {
    let text = "Template [EMAIL_1] was sent to a@x.io";
    let result = scan(text, &ScanOptions::default());
    assert_eq!(result.redacted_text, "Template [EMAIL_1] was sent to [EMAIL_2]");
    let restored = Redactor::default()
        .restore_strict(&result.redacted_text, &result.redaction_map)
        .unwrap();
    assert_eq!(restored, text);
}

#[test]
fn test_map_survives_json() {
    let result = scan(REPORT, &ScanOptions::default());
    let json = serde_json::to_string(&result.redaction_map).unwrap();
    let map = serde_json::from_str(&json).unwrap();
    let restored = Redactor::default().restore(&result.redacted_text, &map).unwrap();
    assert_eq!(restored, REPORT);
}

#[test]
fn test_extra_high_finding_never_raises_score() {
    let redactor = Redactor::default();
    let options = ScanOptions::default();
    let base = redactor.assess("Call 020 7946 0958", &options).unwrap();
    let more = redactor
        .assess("Call 020 7946 0958, SSN 123-45-6789", &options)
        .unwrap();
    assert!(more.privacy_score <= base.privacy_score);
    assert_eq!(more.privacy_score, 55);
}
