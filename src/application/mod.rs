//! Application layer
//!
//! Use cases and application services that orchestrate domain logic.

pub mod dto;
mod scan_and_verify;
mod scan_session_controller;
mod verdict_resolver;

pub use scan_and_verify::ScanAndVerifyUseCase;
pub use scan_session_controller::{
    PayloadCallback, ScanError, ScanSessionController, ScanSessionHandle,
};
pub use verdict_resolver::{ReputationVerdictResolver, ServiceError};
