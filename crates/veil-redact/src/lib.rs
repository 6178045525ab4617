//! Veil Redact — PII detection, reversible redaction, privacy scoring.
//!
//! A text blob flows scanner → resolver → mapper → transformer and comes
//! out as a [`ScanResult`] whose [`RedactionMap`] restores it exactly.
//! Detection covers structured identifiers (email, IBAN, card, NI number,
//! SSN, bank details, phone, IP, URL) plus heuristic addresses, names
//! and dates.

pub mod engine;
pub mod mapper;
pub mod patterns;
pub mod resolve;
pub mod restore;
pub mod scanner;
pub mod score;
pub mod transform;
pub mod validators;

pub use engine::{Redactor, ScanResult};
pub use mapper::{Detection, RedactionEntry, RedactionMap};
pub use patterns::{list_patterns, PiiCategory, PiiPattern, Severity};
pub use scanner::{Match, ScanOptions};
pub use score::{PrivacyReport, RiskLevel};
