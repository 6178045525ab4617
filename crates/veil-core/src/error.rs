//! Error types for Veil.

use thiserror::Error;

/// Why a placeholder could not be reconciled with its redaction map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    /// The text contains a placeholder the map does not know.
    Unknown,
    /// The map holds an entry that never appears in the text (strict mode).
    Unused,
}

impl std::fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "is not present in the redaction map"),
            Self::Unused => write!(f, "is mapped but absent from the text"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input too large: {len} bytes exceeds the {max} byte limit")]
    InputTooLarge { len: usize, max: usize },

    #[error("Restore mismatch: placeholder {placeholder} {reason}")]
    RestoreMismatch {
        placeholder: String,
        reason: MismatchReason,
    },

    #[error("Redaction map not found: {0}")]
    MapNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
