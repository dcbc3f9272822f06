//! PhishTank HTTP transport
//!
//! Submits URLs to the PhishTank `checkurl` API as a form post.

use super::config::PhishTankConfig;
use super::response::decode_body;
use crate::domain::repositories::{
    ReputationResponse, ReputationTransport, RequestQuota, TransportError,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::debug;

/// Status PhishTank uses for "rate limit exceeded"
pub const RATE_LIMIT_STATUS: u16 = 509;

/// Maps an HTTP status to a transport error, `None` on success
pub fn classify_status(status: u16) -> Option<TransportError> {
    let code = StatusCode::from_u16(status).ok();

    if status == RATE_LIMIT_STATUS || code == Some(StatusCode::TOO_MANY_REQUESTS) {
        return Some(TransportError::RateLimited);
    }
    if code.is_some_and(|c| c.is_success()) {
        return None;
    }

    Some(TransportError::Status {
        status,
        reason: code
            .and_then(|c| c.canonical_reason())
            .unwrap_or("Unknown status")
            .to_string(),
    })
}

/// HTTP client for the PhishTank API
pub struct PhishTankClient {
    client: reqwest::Client,
    config: PhishTankConfig,
}

impl PhishTankClient {
    /// Creates a client from configuration
    pub fn new(config: PhishTankConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &PhishTankConfig {
        &self.config
    }

    fn quota(headers: &HeaderMap) -> Option<RequestQuota> {
        let get = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        RequestQuota::from_header_values(
            get("x-request-limit"),
            get("x-request-count"),
            get("x-request-limit-interval"),
        )
    }
}

#[async_trait]
impl ReputationTransport for PhishTankClient {
    async fn lookup(&self, url: &str) -> Result<ReputationResponse, TransportError> {
        let mut form = vec![("url", url), ("format", "json")];
        if let Some(key) = self.config.app_key.as_deref() {
            form.push(("app_key", key));
        }

        let response = self
            .client
            .post(&self.config.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        debug!("PhishTank responded with {}", status);

        if let Some(error) = classify_status(status.as_u16()) {
            return Err(error);
        }

        let quota = Self::quota(response.headers());
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let body = decode_body(&content_type, &text)?;
        Ok(ReputationResponse::new(body).with_quota(quota))
    }
}
