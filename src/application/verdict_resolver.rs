//! Reputation verdict resolver
//!
//! Checks a candidate URL against the reputation service and interprets
//! the response.

use crate::domain::entities::{ReputationVerdict, UnknownReason};
use crate::domain::repositories::{ReputationTransport, RequestQuota, TransportError};
use crate::domain::services::VerdictInterpreter;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The reputation check could not be completed
///
/// Retryable by issuing a new check. `rate_limited` lets the caller show a
/// "try again later" message instead of a generic failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ServiceError {
    pub rate_limited: bool,
    pub message: String,
}

impl ServiceError {
    pub fn is_rate_limited(&self) -> bool {
        self.rate_limited
    }
}

impl From<TransportError> for ServiceError {
    fn from(error: TransportError) -> Self {
        Self {
            rate_limited: matches!(error, TransportError::RateLimited),
            message: error.to_string(),
        }
    }
}

/// Reputation verdict resolver
///
/// No caching: every call issues exactly one lookup.
pub struct ReputationVerdictResolver<T: ReputationTransport> {
    transport: T,
}

impl<T: ReputationTransport> ReputationVerdictResolver<T> {
    /// Creates a new resolver
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Checks `url` and returns its verdict
    ///
    /// Transport failures, error statuses and rate limiting become a
    /// [`ServiceError`]. A body the transport could not parse resolves to
    /// `Unknown`.
    pub async fn check(&self, url: &str) -> Result<ReputationVerdict, ServiceError> {
        debug!("Checking reputation of {}", url);

        let response = match self.transport.lookup(url).await {
            Ok(response) => response,
            Err(TransportError::Malformed(detail)) => {
                warn!("Unparseable reputation response for {}: {}", url, detail);
                return Ok(ReputationVerdict::Unknown(UnknownReason::Unparseable {
                    detail,
                }));
            }
            Err(e) => {
                warn!("Reputation check failed for {}: {}", url, e);
                return Err(ServiceError::from(e));
            }
        };

        if let Some(quota) = &response.quota {
            log_quota(quota);
        }

        let verdict = VerdictInterpreter::interpret(&response.body);
        info!("Reputation verdict for {}: {}", url, verdict);

        Ok(verdict)
    }

    /// Returns the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

fn log_quota(quota: &RequestQuota) {
    if quota.is_exhausted() {
        warn!(
            "Reputation service quota exhausted ({:?} requests per {})",
            quota.limit,
            quota.interval.as_deref().unwrap_or("interval")
        );
    } else {
        debug!(
            "Reputation service quota: {:?}/{:?} per {}",
            quota.count,
            quota.limit,
            quota.interval.as_deref().unwrap_or("interval")
        );
    }
}
