//! Per-category validators. Every validator is a pure function of the raw
//! match; `Err` means the candidate could not be checked and is dropped.

use thiserror::Error;

/// A validator could not evaluate its candidate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidatorFault {
    #[error("malformed numeric component {0:?}")]
    Numeric(String),
    #[error("unexpected {0} shape")]
    Shape(&'static str),
}

type Verdict = Result<bool, ValidatorFault>;

fn digits_of(raw: &str) -> Vec<u32> {
    raw.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn number(group: &str) -> Result<u32, ValidatorFault> {
    group
        .parse()
        .map_err(|_| ValidatorFault::Numeric(group.to_string()))
}

// ---------------------------------------------------------------
// Financial
// ---------------------------------------------------------------

/// Mod-10 sum over the reversed digits, doubling positions whose index
/// parity equals `doubled`.
fn luhn_sum(digits: &[u32], doubled: usize) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == doubled {
                let x = d * 2;
                if x > 9 {
                    x - 9
                } else {
                    x
                }
            } else {
                d
            }
        })
        .sum()
}

/// Luhn check for 13–19 digit card numbers.
///
/// Accepts the standard phase (check digit rightmost) and the phase anchored
/// on the rightmost digit, which the client-side detector uses.
pub fn luhn(raw: &str) -> Verdict {
    let digits = digits_of(raw);
    if !(13..=19).contains(&digits.len()) {
        return Ok(false);
    }
    Ok(luhn_sum(&digits, 1) % 10 == 0 || luhn_sum(&digits, 0) % 10 == 0)
}

/// IBAN lengths by country code.
const IBAN_LENGTHS: &[(&str, usize)] = &[
    ("AD", 24), ("AT", 20), ("BE", 16), ("BG", 22), ("CH", 21), ("CY", 28),
    ("CZ", 24), ("DE", 22), ("DK", 18), ("EE", 20), ("ES", 24), ("FI", 18),
    ("FR", 27), ("GB", 22), ("GI", 23), ("GR", 27), ("HR", 21), ("HU", 28),
    ("IE", 22), ("IS", 26), ("IT", 27), ("LI", 21), ("LT", 20), ("LU", 20),
    ("LV", 21), ("MC", 27), ("MT", 31), ("NL", 18), ("NO", 15), ("PL", 28),
    ("PT", 25), ("RO", 24), ("SE", 24), ("SI", 19), ("SK", 24), ("SM", 27),
];

/// Known country prefix with its fixed length, then mod-97 == 1.
pub fn iban(raw: &str) -> Verdict {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() < 4 || !compact.is_ascii() {
        return Err(ValidatorFault::Shape("IBAN"));
    }
    let country = &compact[..2];
    let expected = IBAN_LENGTHS
        .iter()
        .find(|(code, _)| *code == country)
        .map(|(_, len)| *len);
    if expected != Some(compact.len()) {
        return Ok(false);
    }

    let rearranged = compact[4..].chars().chain(compact[..4].chars());
    let mut remainder: u32 = 0;
    for c in rearranged {
        remainder = match c {
            '0'..='9' => (remainder * 10 + (c as u32 - '0' as u32)) % 97,
            'A'..='Z' => (remainder * 100 + (c as u32 - 'A' as u32 + 10)) % 97,
            _ => return Err(ValidatorFault::Shape("IBAN")),
        };
    }
    Ok(remainder == 1)
}

// ---------------------------------------------------------------
// National identifiers
// ---------------------------------------------------------------

const NINO_BAD_FIRST: &str = "DFIQUV";
const NINO_BAD_SECOND: &str = "DFIOQUV";
const NINO_BAD_PREFIXES: &[&str] = &["BG", "GB", "KN", "NK", "NT", "TN", "ZZ"];

/// UK National Insurance number: two-letter prefix, six digits, suffix A–D.
pub fn national_insurance(raw: &str) -> Verdict {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if compact.len() != 9 || !compact.is_ascii() {
        return Ok(false);
    }
    let (prefix, rest) = compact.split_at(2);
    let (digits, suffix) = rest.split_at(6);

    let mut letters = prefix.chars();
    let (Some(first), Some(second)) = (letters.next(), letters.next()) else {
        return Err(ValidatorFault::Shape("NI number"));
    };
    Ok(first.is_ascii_alphabetic()
        && second.is_ascii_alphabetic()
        && !NINO_BAD_FIRST.contains(first)
        && !NINO_BAD_SECOND.contains(second)
        && !NINO_BAD_PREFIXES.contains(&prefix)
        && digits.chars().all(|c| c.is_ascii_digit())
        && matches!(suffix, "A" | "B" | "C" | "D"))
}

/// US SSN: area not 000, 666 or 9xx; group not 00; serial not 0000.
pub fn ssn(raw: &str) -> Verdict {
    let groups: Vec<&str> = raw.split('-').collect();
    let [area, group, serial] = groups.as_slice() else {
        return Err(ValidatorFault::Shape("SSN"));
    };
    let (area, group, serial) = (number(area)?, number(group)?, number(serial)?);
    Ok(area != 0 && area != 666 && area < 900 && group != 0 && serial != 0)
}

// ---------------------------------------------------------------
// Contact / network
// ---------------------------------------------------------------

/// Phone numbers carry 10–15 digits including any country code.
pub fn phone(raw: &str) -> Verdict {
    Ok((10..=15).contains(&digits_of(raw).len()))
}

/// Four dot-separated components, each an integer in [0, 255].
pub fn ip_address(raw: &str) -> Verdict {
    let octets: Vec<&str> = raw.split('.').collect();
    if octets.len() != 4 {
        return Ok(false);
    }
    for octet in octets {
        if number(octet)? > 255 {
            return Ok(false);
        }
    }
    Ok(true)
}

// ---------------------------------------------------------------
// Dates
// ---------------------------------------------------------------

fn day_month(day: u32, month: u32) -> bool {
    (1..=31).contains(&day) && (1..=12).contains(&month)
}

/// Numeric dates accept either day/month order; ISO dates are
/// year-month-day; month-name dates only check the day.
pub fn calendar_date(raw: &str) -> Verdict {
    let groups: Vec<&str> = raw
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    let named_month = raw.chars().any(|c| c.is_ascii_alphabetic());

    match groups.as_slice() {
        [year, month, day] if year.len() == 4 => Ok(day_month(number(day)?, number(month)?)),
        [a, b, _year] if !named_month => {
            let (a, b) = (number(a)?, number(b)?);
            Ok(day_month(a, b) || day_month(b, a))
        }
        [day, _year] if named_month => Ok((1..=31).contains(&number(day)?)),
        _ => Err(ValidatorFault::Shape("date")),
    }
}

// ---------------------------------------------------------------
// Names
// ---------------------------------------------------------------

/// Organisational phrases that look like capitalised names.
const BUSINESS_TERMS: &[&str] = &[
    "customer care", "customer service", "customer services", "customer support",
    "human resources", "health and safety", "board of directors", "senior management",
    "head office", "line manager", "managing director", "chief executive",
    "finance department", "legal department", "sales team", "compliance team",
    "data protection", "internal audit", "quality assurance", "public relations",
    "accounts payable", "accounts receivable", "help desk", "service desk",
    "code of conduct", "ethics committee", "audit committee", "general manager",
    "operations manager", "project manager", "team leader", "risk management",
    "information security", "it support", "tech support", "supply chain",
    "research and development", "whistleblowing policy", "ethics hotline",
];

/// Multi-word place names.
const PLACE_NAMES: &[&str] = &[
    "new york", "new jersey", "new zealand", "new mexico", "new delhi", "new orleans",
    "united kingdom", "united states", "united arab emirates", "great britain",
    "northern ireland", "south africa", "north america", "south america",
    "latin america", "middle east", "hong kong", "saudi arabia", "san francisco",
    "los angeles", "las vegas", "san diego", "costa rica", "sri lanka",
    "czech republic", "european union", "isle of man", "west midlands",
    "east midlands", "greater london", "greater manchester", "north yorkshire",
    "south yorkshire", "west yorkshire", "puerto rico", "buenos aires",
    "tel aviv", "kuala lumpur", "cape town", "abu dhabi",
];

/// Any of these tokens marks a street, building or organisation.
const NON_PERSON_WORDS: &[&str] = &[
    "street", "road", "avenue", "lane", "drive", "close", "way", "court", "place",
    "square", "gardens", "grove", "terrace", "crescent", "boulevard", "mews",
    "house", "building", "tower", "centre", "center", "estate", "floor", "office",
    "hall", "station", "airport", "hospital", "school", "university", "college",
    "bridge", "ltd", "limited", "plc", "inc", "corp", "corporation", "company",
    "group", "holdings", "bank", "council", "department", "ministry", "agency",
    "committee", "team", "services", "solutions", "foundation", "trust",
    "association",
];

/// Capitalised calendar words are never part of a person's name here.
const CALENDAR_WORDS: &[&str] = &[
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    "january", "february", "march", "april", "june", "july", "august",
    "september", "october", "november", "december", "christmas", "easter",
];

/// Sentence openers and action words that precede capitalised phrases.
const GENERIC_LEADING_WORDS: &[&str] = &[
    "improper", "unauthorized", "unauthorised", "inappropriate", "illegal",
    "unlawful", "fraudulent", "alleged", "suspected", "possible", "visit",
    "visited", "dear", "hello", "hi", "thanks", "thank", "please", "regards",
    "kind", "best", "the", "this", "that", "these", "those", "there", "here",
    "my", "our", "your", "their", "his", "her", "its", "we", "they", "he", "she",
    "it", "when", "where", "while", "what", "which", "who", "why", "how", "then",
    "after", "before", "during", "since", "until", "yesterday", "today",
    "tomorrow", "last", "next", "every", "each", "all", "some", "any", "also",
    "however", "although", "because", "but", "and", "or", "if", "on", "in", "at",
    "for", "from", "with", "without", "about", "report", "reported", "reporting",
    "urgent", "confidential", "private", "important", "note", "re", "subject",
    "sent", "received", "attached", "no", "not", "very", "really", "just",
    "still", "now", "sorry", "going", "writing", "concerned", "worried",
    "afraid", "many", "several", "one", "two", "three", "first", "second",
    "third", "new", "old", "senior", "junior", "head", "chief", "acting",
    "interim", "former", "annual", "quarterly", "monthly", "weekly", "daily",
    "north", "south", "east", "west", "central", "great", "united", "general",
    "finance", "sales", "marketing", "legal", "compliance", "safety", "health",
    "security", "internal", "external", "customer", "client", "human", "data",
    "tech", "project", "staff", "management", "board",
];

fn contains_phrase(lower: &str, phrase: &str) -> bool {
    format!(" {} ", lower).contains(&format!(" {} ", phrase))
}

/// Heuristic person-name check. False positives and negatives are expected.
pub fn person_name(raw: &str) -> Verdict {
    let lower = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    let tokens: Vec<&str> = lower.split(' ').collect();
    let Some(first) = tokens.first().filter(|t| !t.is_empty()) else {
        return Err(ValidatorFault::Shape("name"));
    };

    if BUSINESS_TERMS
        .iter()
        .chain(PLACE_NAMES)
        .any(|term| contains_phrase(&lower, term))
    {
        return Ok(false);
    }
    if GENERIC_LEADING_WORDS.contains(first) {
        return Ok(false);
    }
    if tokens
        .iter()
        .any(|t| NON_PERSON_WORDS.contains(t) || CALENDAR_WORDS.contains(t))
    {
        return Ok(false);
    }
    Ok(true)
}
