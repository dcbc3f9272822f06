//! Data Transfer Objects

mod verification_outcome;

pub use verification_outcome::{OutcomeReport, VerificationOutcome};
