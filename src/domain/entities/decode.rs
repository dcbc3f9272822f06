//! Decoded payload entity
//!
//! The text pulled out of a single camera frame, and the closed set of
//! reasons a frame can fail to decode.

use serde::Serialize;
use std::fmt;

/// Text decoded from one QR code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DecodedPayload(String);

impl DecodedPayload {
    /// Wraps decoded text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the decoded text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the text
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether the payload carries an http(s) URL
    pub fn is_web_url(&self) -> bool {
        let text = self.0.trim_start();
        let scheme_end = text.find("://").unwrap_or(0);
        let scheme = &text[..scheme_end];
        scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
    }
}

impl fmt::Display for DecodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classification of a frame that produced no payload
///
/// Supplied by the decoding collaborator. `NoDetection` and
/// `ChecksumMismatch` fire on almost every frame while the camera is
/// pointed at nothing in particular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecodeErrorKind {
    /// No QR symbol found in the frame
    NoDetection,
    /// A symbol was found but its error correction failed
    ChecksumMismatch,
    /// Anything else the decoder reports
    Other,
}

impl DecodeErrorKind {
    /// Expected per-frame noise that is never surfaced
    pub fn is_noise(self) -> bool {
        matches!(self, Self::NoDetection | Self::ChecksumMismatch)
    }

    /// Returns the name of the kind
    pub fn name(self) -> &'static str {
        match self {
            Self::NoDetection => "no detection",
            Self::ChecksumMismatch => "checksum mismatch",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
