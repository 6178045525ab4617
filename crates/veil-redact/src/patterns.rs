//! PII pattern registry — categories, severities, compiled matchers.
//!
//! The registry is a read-only table built on first use. Its order is the
//! tie-break order of the overlap resolver: when two candidates start at the
//! same offset with the same length, the earlier-registered category wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scanner::ScanOptions;
use crate::validators::{self, ValidatorFault};

/// Categories of PII the engine detects, in registry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PiiCategory {
    Email,
    Iban,
    CreditCard,
    NationalId,
    Ssn,
    BankAccount,
    Phone,
    IpAddress,
    Url,
    Address,
    Postcode,
    PossibleName,
    StandaloneName,
    SpecificDate,
}

impl PiiCategory {
    pub fn all() -> &'static [PiiCategory] {
        &[
            Self::Email,
            Self::Iban,
            Self::CreditCard,
            Self::NationalId,
            Self::Ssn,
            Self::BankAccount,
            Self::Phone,
            Self::IpAddress,
            Self::Url,
            Self::Address,
            Self::Postcode,
            Self::PossibleName,
            Self::StandaloneName,
            Self::SpecificDate,
        ]
    }

    /// Placeholder label. Both name categories share `NAME` so a person
    /// keeps one placeholder however they were found.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "EMAIL",
            Self::Iban => "IBAN",
            Self::CreditCard => "CARD",
            Self::NationalId => "NI_NUMBER",
            Self::Ssn => "SSN",
            Self::BankAccount => "BANK_ACCOUNT",
            Self::Phone => "PHONE",
            Self::IpAddress => "IP_ADDRESS",
            Self::Url => "URL",
            Self::Address => "ADDRESS",
            Self::Postcode => "POSTCODE",
            Self::PossibleName | Self::StandaloneName => "NAME",
            Self::SpecificDate => "DATE",
        }
    }

    pub fn severity(&self) -> Severity {
        pattern_for(*self).severity
    }

    /// Heuristic categories switched by `ScanOptions`; everything else is
    /// always active.
    pub fn is_enabled(&self, options: &ScanOptions) -> bool {
        match self {
            Self::PossibleName | Self::StandaloneName => options.include_names,
            Self::Address | Self::Postcode => options.include_addresses,
            _ => true,
        }
    }
}

impl std::fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// How damaging a leak of the category would be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Rejects syntactically plausible candidates that fail a semantic check.
pub type Validator = fn(&str) -> Result<bool, ValidatorFault>;

/// Renders the placeholder for the `n`th distinct value of a label.
pub type PlaceholderFn = fn(label: &str, n: usize, raw: &str) -> String;

/// One registry entry.
pub struct PiiPattern {
    pub category: PiiCategory,
    /// When the regex has capture groups, the first participating group is
    /// the PII span and the rest of the match is context.
    pub regex: Regex,
    pub severity: Severity,
    pub validator: Option<Validator>,
    pub redactor: PlaceholderFn,
    /// Retry a rejected candidate with its trailing space-separated groups
    /// dropped, longest first.
    pub trims_tail: bool,
}

impl PiiPattern {
    /// Run the validator, if any. Candidates without one are accepted.
    pub fn validate(&self, raw: &str) -> Result<bool, ValidatorFault> {
        match self.validator {
            Some(validate) => validate(raw),
            None => Ok(true),
        }
    }

    pub fn placeholder(&self, n: usize, raw: &str) -> String {
        (self.redactor)(self.category.label(), n, raw)
    }
}

impl std::fmt::Debug for PiiPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiiPattern")
            .field("category", &self.category)
            .field("regex", &self.regex.as_str())
            .field("severity", &self.severity)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// `[EMAIL_1]`
fn plain_placeholder(label: &str, n: usize, _raw: &str) -> String {
    format!("[{}_{}]", label, n)
}

/// `[CARD_1 ************9010]` — last four digits kept, the rest masked.
fn masked_digits_placeholder(label: &str, n: usize, raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let keep = digits.len().min(4);
    let masked = digits.len() - keep;
    let tail: String = digits[masked..].iter().collect();
    format!("[{}_{} {}{}]", label, n, "*".repeat(masked.max(1)), tail)
}

const NAME_WORD: &str = r"[A-Z][a-z]+(?:['-][A-Z][a-z]+)?";

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec";

const STREET_SUFFIXES: &str = "Street|St|Road|Rd|Avenue|Ave|Lane|Ln|Drive|Dr|Close|Way|Court|Ct|Place|Pl|Boulevard|Blvd|Crescent|Terrace|Square|Gardens|Grove|Row|Mews";

const CONTEXT_PREFIXES: &str = r"my\s+name\s+is|i\s+am|i'm|called|named|mr\.?|mrs\.?|ms\.?|miss|dr\.?|prof\.?|manager|supervisor|colleague|co-?worker|boss|director|witness|reported\s+by|signed\s+by|contact";

static REGISTRY: Lazy<Vec<PiiPattern>> = Lazy::new(|| {
    vec![
        PiiPattern {
            category: PiiCategory::Email,
            regex: Regex::new(r"\b[\p{L}\p{N}._%+-]+@[\p{L}\p{N}.-]+\.\p{L}{2,}\b").unwrap(),
            severity: Severity::High,
            validator: None,
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::Iban,
            regex: Regex::new(r"\b[A-Z]{2}\d{2}(?: ?[A-Z0-9]{4}){2,7}(?: ?[A-Z0-9]{1,3})?\b")
                .unwrap(),
            severity: Severity::High,
            validator: Some(validators::iban),
            redactor: plain_placeholder,
            trims_tail: true,
        },
        PiiPattern {
            category: PiiCategory::CreditCard,
            regex: Regex::new(r"\b(?:\d{4}[- ]?){3}\d{4}\b|\b\d{4}[- ]?\d{6}[- ]?\d{5}\b").unwrap(),
            severity: Severity::High,
            validator: Some(validators::luhn),
            redactor: masked_digits_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::NationalId,
            regex: Regex::new(r"\b[A-Z]{2} ?\d{2} ?\d{2} ?\d{2} ?[A-Z]\b").unwrap(),
            severity: Severity::High,
            validator: Some(validators::national_insurance),
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::Ssn,
            regex: Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap(),
            severity: Severity::High,
            validator: Some(validators::ssn),
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::BankAccount,
            regex: Regex::new(concat!(
                r"\b(\d{2}-\d{2}-\d{2}[ \t]+\d{8})\b",
                r"|\b(?i:sort[ \t]+code)[ \t]*:?[ \t]*(\d{2}-\d{2}-\d{2})\b",
                r"|\b(?i:account[ \t]+(?:number|no\.?|#))[ \t]*:?[ \t]*(\d{6,12})\b",
            ))
            .unwrap(),
            severity: Severity::High,
            validator: None,
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::Phone,
            regex: Regex::new(concat!(
                r"(?:\+1[ .-]?)?(?:\(\d{3}\)|\b\d{3})[ .-]?\d{3}[ .-]?\d{4}\b",
                r"|(?:\+44[ ]?(?:\(0\)[ ]?)?|\b0)\d{2,4}[ ]?\d{3,4}[ ]?\d{3,4}\b",
                r"|\+[2-9]\d{0,2}[ .-]?\d{1,4}(?:[ .-]?\d{2,4}){2,4}\b",
            ))
            .unwrap(),
            severity: Severity::Medium,
            validator: Some(validators::phone),
            redactor: masked_digits_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::IpAddress,
            regex: Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").unwrap(),
            severity: Severity::Medium,
            validator: Some(validators::ip_address),
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::Url,
            regex: Regex::new(r#"\b(?:https?://|www\.)[^\s<>"'\[\]]*[^\s<>"'\[\].,;:!?)]"#).unwrap(),
            severity: Severity::Low,
            validator: None,
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::Address,
            regex: Regex::new(&format!(
                r"\b\d{{1,5}}[A-Za-z]?,?[ ]+(?:{w}[ ]+){{1,3}}(?:{s})\b",
                w = NAME_WORD,
                s = STREET_SUFFIXES,
            ))
            .unwrap(),
            severity: Severity::Medium,
            validator: None,
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::Postcode,
            regex: Regex::new(r"\b(?:[A-Z]{1,2}\d[A-Z\d]?|GIR) ?\d[A-Z]{2}\b|\b\d{5}-\d{4}\b")
                .unwrap(),
            severity: Severity::Low,
            validator: None,
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::PossibleName,
            regex: Regex::new(&format!(
                r"\b(?i:{p})\s+({w}(?:[ ]+{w}){{0,2}})\b",
                p = CONTEXT_PREFIXES,
                w = NAME_WORD,
            ))
            .unwrap(),
            severity: Severity::Medium,
            validator: Some(validators::person_name),
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::StandaloneName,
            regex: Regex::new(&format!(r"\b{w}(?:[ ]+{w}){{1,2}}\b", w = NAME_WORD)).unwrap(),
            severity: Severity::Low,
            validator: Some(validators::person_name),
            redactor: plain_placeholder,
            trims_tail: false,
        },
        PiiPattern {
            category: PiiCategory::SpecificDate,
            regex: Regex::new(&format!(
                concat!(
                    r"\b\d{{4}}-\d{{2}}-\d{{2}}\b",
                    r"|\b\d{{1,2}}[/.-]\d{{1,2}}[/.-](?:\d{{4}}|\d{{2}})\b",
                    r"|\b\d{{1,2}}(?:st|nd|rd|th)?[ ]+(?:{m})\.?,?[ ]+\d{{4}}\b",
                    r"|\b(?:{m})\.?[ ]+\d{{1,2}}(?:st|nd|rd|th)?,?[ ]+\d{{4}}\b",
                ),
                m = MONTHS,
            ))
            .unwrap(),
            severity: Severity::Low,
            validator: Some(validators::calendar_date),
            redactor: plain_placeholder,
            trims_tail: false,
        },
    ]
});

/// The full registry in tie-break order.
pub fn list_patterns() -> &'static [PiiPattern] {
    &REGISTRY
}

/// Registry entry for a category. Declaration order of `PiiCategory`
/// matches registry order, so the discriminant is the index.
pub fn pattern_for(category: PiiCategory) -> &'static PiiPattern {
    &REGISTRY[category as usize]
}
