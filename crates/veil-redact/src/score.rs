//! Privacy scoring and human-readable summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::mapper::Detection;
use crate::patterns::{PiiCategory, Severity};

/// Score deduction for one finding of the given severity.
pub fn severity_weight(severity: Severity) -> u32 {
    match severity {
        Severity::High => 30,
        Severity::Medium => 15,
        Severity::Low => 5,
    }
}

/// 100 minus a fixed weight per finding, floored at 0.
pub fn score(stats: &BTreeMap<PiiCategory, usize>) -> u8 {
    let deduction: u32 = stats
        .iter()
        .map(|(category, count)| {
            severity_weight(category.severity()).saturating_mul(*count as u32)
        })
        .fold(0u32, |acc, d| acc.saturating_add(d));
    100u32.saturating_sub(deduction) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

pub fn risk_level(score: u8) -> RiskLevel {
    match score {
        80.. => RiskLevel::Low,
        50..=79 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

fn nouns(category: PiiCategory) -> (&'static str, &'static str) {
    match category {
        PiiCategory::Email => ("email address", "email addresses"),
        PiiCategory::Iban => ("IBAN", "IBANs"),
        PiiCategory::CreditCard => ("credit card number", "credit card numbers"),
        PiiCategory::NationalId => ("National Insurance number", "National Insurance numbers"),
        PiiCategory::Ssn => ("Social Security number", "Social Security numbers"),
        PiiCategory::BankAccount => ("bank account detail", "bank account details"),
        PiiCategory::Phone => ("phone number", "phone numbers"),
        PiiCategory::IpAddress => ("IP address", "IP addresses"),
        PiiCategory::Url => ("URL", "URLs"),
        PiiCategory::Address => ("street address", "street addresses"),
        PiiCategory::Postcode => ("postcode", "postcodes"),
        PiiCategory::PossibleName => ("named person", "named people"),
        PiiCategory::StandaloneName => ("possible name", "possible names"),
        PiiCategory::SpecificDate => ("specific date", "specific dates"),
    }
}

/// Count detections per category.
pub fn detection_stats(detections: &[Detection]) -> BTreeMap<PiiCategory, usize> {
    let mut stats = BTreeMap::new();
    for detection in detections {
        *stats.entry(detection.category).or_insert(0) += 1;
    }
    stats
}

/// One sentence listing counts per category in registry order, e.g.
/// "Detected 2 email addresses and 1 phone number."
pub fn summarize(detections: &[Detection]) -> String {
    if detections.is_empty() {
        return "No privacy risks detected.".to_string();
    }

    let parts: Vec<String> = detection_stats(detections)
        .into_iter()
        .map(|(category, count)| {
            let (singular, plural) = nouns(category);
            format!("{} {}", count, if count == 1 { singular } else { plural })
        })
        .collect();

    let listed = match parts.split_last() {
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
        None => String::new(),
    };
    format!("Detected {}.", listed)
}

/// Score, risk level and summary for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyReport {
    pub privacy_score: u8,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub detection_stats: BTreeMap<PiiCategory, usize>,
    pub pii_detected: bool,
}

impl PrivacyReport {
    pub fn from_detections(detections: &[Detection]) -> Self {
        let stats = detection_stats(detections);
        let privacy_score = score(&stats);
        Self {
            privacy_score,
            risk_level: risk_level(privacy_score),
            summary: summarize(detections),
            pii_detected: !stats.is_empty(),
            detection_stats: stats,
        }
    }
}
