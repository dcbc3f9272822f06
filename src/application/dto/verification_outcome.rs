//! Verification outcome DTO

use crate::application::verdict_resolver::ServiceError;
use crate::domain::entities::{DecodedPayload, ReputationVerdict};
use serde::Serialize;

/// Result of scanning a code and checking its URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// The payload that was checked
    pub payload: DecodedPayload,
    /// Verdict, or why the check could not complete
    pub verdict: Result<ReputationVerdict, ServiceError>,
}

/// Flat, serializable form of an outcome
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReport<'a> {
    pub payload: &'a str,
    pub status: &'static str,
    pub headline: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl VerificationOutcome {
    pub fn new(payload: DecodedPayload, verdict: Result<ReputationVerdict, ServiceError>) -> Self {
        Self { payload, verdict }
    }

    /// Whether the user should be kept away from the URL
    pub fn is_alarming(&self) -> bool {
        matches!(self.verdict, Ok(ReputationVerdict::Suspicious))
    }

    /// Short status keyword
    pub fn status(&self) -> &'static str {
        match &self.verdict {
            Ok(verdict) => verdict.label(),
            Err(e) if e.rate_limited => "rate_limited",
            Err(_) => "error",
        }
    }

    /// One-line message for the user
    pub fn headline(&self) -> &'static str {
        match &self.verdict {
            Ok(ReputationVerdict::Suspicious) => "Phishing alert",
            Ok(ReputationVerdict::Safe) => "Safe",
            Ok(ReputationVerdict::Unknown(_)) => "Could not verify",
            Err(e) if e.rate_limited => "Rate limited, try again later",
            Err(_) => "Verification failed",
        }
    }

    /// Extra explanation, when there is any
    pub fn detail(&self) -> Option<String> {
        match &self.verdict {
            Ok(ReputationVerdict::Unknown(reason)) => Some(reason.to_string()),
            Ok(_) => None,
            Err(e) => Some(e.message.clone()),
        }
    }

    pub fn report(&self) -> OutcomeReport<'_> {
        OutcomeReport {
            payload: self.payload.as_str(),
            status: self.status(),
            headline: self.headline(),
            detail: self.detail(),
        }
    }
}
