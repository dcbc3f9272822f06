//! Infrastructure layer
//!
//! Concrete implementations of the domain repositories.
//! This layer contains all network and device-specific code.

pub mod phishtank;
pub mod replay;
