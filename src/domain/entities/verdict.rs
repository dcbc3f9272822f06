//! Reputation verdict entity

use serde::Serialize;
use std::fmt;

/// Why a reputation response could not be turned into a firm verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnknownReason {
    /// The body was not a JSON object
    NotAnObject,
    /// No `results` payload, or `results` was null
    MissingResults,
    /// `results` was present but not an object
    ResultsNotAnObject,
    /// A required flag was absent
    MissingField { field: &'static str },
    /// A flag had a value that is neither a boolean nor `y`/`n`
    UnrecognizedFlag { field: &'static str, value: String },
    /// The transport returned a body it could not parse
    Unparseable { detail: String },
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "response is not an object"),
            Self::MissingResults => write!(f, "response has no results"),
            Self::ResultsNotAnObject => write!(f, "results is not an object"),
            Self::MissingField { field } => write!(f, "missing field '{}'", field),
            Self::UnrecognizedFlag { field, value } => {
                write!(f, "unrecognized value {} for '{}'", value, field)
            }
            Self::Unparseable { detail } => write!(f, "unparseable response: {}", detail),
        }
    }
}

/// Three-valued outcome of a reputation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum ReputationVerdict {
    /// Known to the service but not a verified phish, or not known at all
    Safe,
    /// Listed and verified as phishing
    Suspicious,
    /// Verification failed
    Unknown(UnknownReason),
}

impl ReputationVerdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }

    pub fn is_suspicious(&self) -> bool {
        matches!(self, Self::Suspicious)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Short lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Suspicious => "suspicious",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl fmt::Display for ReputationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(reason) => write!(f, "unknown ({})", reason),
            other => f.write_str(other.label()),
        }
    }
}
