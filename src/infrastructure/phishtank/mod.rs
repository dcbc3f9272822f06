//! PhishTank reputation adapter

mod client;
mod config;
mod response;

pub use client::{classify_status, PhishTankClient, RATE_LIMIT_STATUS};
pub use config::{
    ConfigError, PhishTankConfig, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, ENV_APP_KEY, ENV_ENDPOINT,
    ENV_TIMEOUT_MS,
};
pub use response::{decode_body, parse_xml};
