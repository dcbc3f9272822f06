//! Verdict interpreter
//!
//! Maps a reputation response body onto a verdict. The service encodes its
//! flags either as JSON booleans or as `"y"`/`"n"` strings, sometimes within
//! the same response, so both are normalized here.

use crate::domain::entities::{ReputationVerdict, UnknownReason};
use serde_json::{Map, Value};

const RESULTS: &str = "results";
const IN_DATABASE: &str = "in_database";
const VERIFIED: &str = "verified";

/// Normalizes a reputation flag
///
/// Accepts JSON booleans and the strings `y`, `n`, `true`, `false`
/// (case-insensitive, surrounding whitespace ignored). Anything else is
/// unresolvable.
pub fn normalize_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("y") || s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s.eq_ignore_ascii_case("n") || s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Turns reputation response bodies into verdicts
///
/// `Suspicious` only when the URL is both in the database and verified.
/// `Safe` needs both flags present and resolvable. Every other shape,
/// including a missing `results` payload, is `Unknown`.
pub struct VerdictInterpreter;

impl VerdictInterpreter {
    /// Interprets a response body
    pub fn interpret(body: &Value) -> ReputationVerdict {
        match Self::resolve(body) {
            Ok((true, true)) => ReputationVerdict::Suspicious,
            Ok(_) => ReputationVerdict::Safe,
            Err(reason) => ReputationVerdict::Unknown(reason),
        }
    }

    fn resolve(body: &Value) -> Result<(bool, bool), UnknownReason> {
        let root = body.as_object().ok_or(UnknownReason::NotAnObject)?;

        let results = match root.get(RESULTS) {
            None | Some(Value::Null) => return Err(UnknownReason::MissingResults),
            Some(results) => results
                .as_object()
                .ok_or(UnknownReason::ResultsNotAnObject)?,
        };

        let in_database = Self::flag(results, IN_DATABASE)?;
        let verified = Self::flag(results, VERIFIED)?;

        Ok((in_database, verified))
    }

    fn flag(results: &Map<String, Value>, field: &'static str) -> Result<bool, UnknownReason> {
        let value = match results.get(field) {
            None | Some(Value::Null) => return Err(UnknownReason::MissingField { field }),
            Some(value) => value,
        };

        normalize_flag(value).ok_or_else(|| UnknownReason::UnrecognizedFlag {
            field,
            value: value.to_string(),
        })
    }
}
