use thiserror::Error;

use crate::http_client::HttpError;

/// Why a required field of a record could not be extracted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldFault {
    #[error("field is missing")]
    Missing,
    #[error("expected {expected}")]
    WrongType { expected: &'static str },
    #[error("'{value}' is not an unsigned integer")]
    NotUnsigned { value: String },
}

/// A required field was absent, had the wrong JSON type, or could not be converted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed field '{field}': {reason}")]
pub struct MalformedField {
    pub field: &'static str,
    pub reason: FieldFault,
}

impl MalformedField {
    pub const fn missing(field: &'static str) -> Self {
        Self {
            field,
            reason: FieldFault::Missing,
        }
    }

    pub const fn wrong_type(field: &'static str, expected: &'static str) -> Self {
        Self {
            field,
            reason: FieldFault::WrongType { expected },
        }
    }

    pub fn not_unsigned(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            reason: FieldFault::NotUnsigned {
                value: value.into(),
            },
        }
    }
}

/// Per-line failure. Always recovered by the line processor.
#[derive(Debug, Error)]
pub enum LineError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Malformed(#[from] MalformedField),
}

/// The endpoint body could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("exceeded retry limit after {attempts} attempt(s): {last}")]
    Exhausted { attempts: u32, last: HttpError },

    #[error("request rejected: {0}")]
    Rejected(HttpError),
}

impl FetchError {
    pub fn last_error(&self) -> &HttpError {
        match self {
            Self::Exhausted { last, .. } => last,
            Self::Rejected(error) => error,
        }
    }
}

/// The report could not be rendered.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
