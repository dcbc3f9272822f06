//! Reputation transport trait
//!
//! Abstracts the network call to the phishing-reputation service.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by the reputation transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Reputation service responded with {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Reputation service error: {0}")]
    Service(String),

    #[error("Unexpected response format: {0}")]
    Malformed(String),
}

/// Request quota reported by the service alongside a response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestQuota {
    /// Requests allowed per interval
    pub limit: Option<u32>,
    /// Requests made in the current interval
    pub count: Option<u32>,
    /// Interval description, as sent by the service
    pub interval: Option<String>,
}

impl RequestQuota {
    /// Builds a quota from raw header values; `None` when nothing usable
    /// was sent
    pub fn from_header_values(
        limit: Option<&str>,
        count: Option<&str>,
        interval: Option<&str>,
    ) -> Option<Self> {
        let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<u32>().ok());
        let interval = interval
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let quota = Self {
            limit: parse(limit),
            count: parse(count),
            interval,
        };

        if quota == Self::default() {
            None
        } else {
            Some(quota)
        }
    }

    /// Requests left in the current interval, when both numbers are known
    pub fn remaining(&self) -> Option<u32> {
        match (self.limit, self.count) {
            (Some(limit), Some(count)) => Some(limit.saturating_sub(count)),
            _ => None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == Some(0)
    }
}

/// Structured response from the reputation service
#[derive(Debug, Clone, PartialEq)]
pub struct ReputationResponse {
    /// Decoded body; shape is loosely specified by the service
    pub body: Value,
    /// Quota headers, when the service sent them
    pub quota: Option<RequestQuota>,
}

impl ReputationResponse {
    pub fn new(body: Value) -> Self {
        Self { body, quota: None }
    }

    pub fn with_quota(mut self, quota: Option<RequestQuota>) -> Self {
        self.quota = quota;
        self
    }
}

/// Trait for looking up a URL with a reputation service
#[async_trait]
pub trait ReputationTransport: Send + Sync {
    /// Looks up `url` and returns the decoded response
    async fn lookup(&self, url: &str) -> Result<ReputationResponse, TransportError>;
}
