//! Domain entities
//!
//! Core objects of a scan session: the session state itself, the decoded
//! payload and the verdict produced for it.

mod decode;
mod scan_session;
mod verdict;

pub use decode::{DecodeErrorKind, DecodedPayload};
pub use scan_session::{Admission, FailureDisposition, ScanSession, SessionState, SessionStats};
pub use verdict::{ReputationVerdict, UnknownReason};
