//! Continuous decode capability trait
//!
//! The QR decoding algorithm is an external collaborator. It reads frames
//! from a stream and reports one event per analyzed frame until halted.

use super::camera::FrameStream;
use crate::domain::entities::DecodeErrorKind;
use std::sync::Arc;
use thiserror::Error;

/// Errors starting the decoder
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecoderError {
    #[error("Decoder could not start: {0}")]
    StartFailed(String),
}

/// A frame the decoder could not turn into a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub kind: DecodeErrorKind,
    pub message: String,
}

impl DecodeFailure {
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn no_detection() -> Self {
        Self::new(DecodeErrorKind::NoDetection, "no QR code found in frame")
    }

    pub fn checksum_mismatch() -> Self {
        Self::new(DecodeErrorKind::ChecksumMismatch, "QR code checksum mismatch")
    }
}

/// Result of analyzing one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// Text decoded from the frame
    Decoded(String),
    /// The frame produced no payload
    Failed(DecodeFailure),
    /// The frame source ran dry; no further events follow
    StreamEnded,
}

/// Per-frame callback handed to the decoder
pub type FrameSink = Arc<dyn Fn(DecodeEvent) + Send + Sync>;

/// Handle used to halt a running decoder
pub trait DecodeControl: Send {
    /// Asks the decoder to stop delivering events
    ///
    /// Must not block: it may be called from inside the sink, on the
    /// decoder's own thread. Events already in flight may still arrive.
    fn halt(&mut self);
}

/// Trait for continuous QR decoding
///
/// Implementations deliver events from their own thread or task. Events
/// may arrive before `decode_continuously` has returned, including
/// synchronously from inside the call.
pub trait DecodeCapability: Send + Sync {
    /// Starts decoding frames from `stream`
    fn decode_continuously(
        &self,
        stream: &dyn FrameStream,
        sink: FrameSink,
    ) -> Result<Box<dyn DecodeControl>, DecoderError>;
}
