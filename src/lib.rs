//! QRTrust scan and verify core
//!
//! Scans QR codes from a camera, accepts exactly one payload per session and
//! checks the URL it carries against a phishing-reputation service.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::{
    ReputationVerdictResolver, ScanAndVerifyUseCase, ScanError, ScanSessionController,
    ScanSessionHandle, ServiceError,
};
pub use domain::entities::{DecodedPayload, ReputationVerdict, ScanSession, UnknownReason};
pub use domain::repositories::FrameConstraints;
