//! Replay decoder
//!
//! Decodes frames recorded in a frame log on a background thread.

use super::frame_log::parse_frame;
use crate::domain::entities::DecodeErrorKind;
use crate::domain::repositories::{
    DecodeCapability, DecodeControl, DecodeEvent, DecodeFailure, DecoderError, Frame, FrameSink,
    FrameStream,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::trace;

/// Decoder for replayed frames
#[derive(Debug, Clone, Default)]
pub struct ReplayDecoder {
    frame_interval: Duration,
}

impl ReplayDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pauses between frames, to pace the replay like a real camera
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    /// Decodes a single recorded frame
    pub fn decode_frame(frame: &Frame) -> DecodeEvent {
        let parsed = std::str::from_utf8(&frame.data)
            .map_err(|e| e.to_string())
            .and_then(parse_frame);

        parsed.unwrap_or_else(|message| {
            DecodeEvent::Failed(DecodeFailure::new(
                DecodeErrorKind::Other,
                format!("frame {}: {}", frame.sequence, message),
            ))
        })
    }
}

impl DecodeCapability for ReplayDecoder {
    fn decode_continuously(
        &self,
        stream: &dyn FrameStream,
        sink: FrameSink,
    ) -> Result<Box<dyn DecodeControl>, DecoderError> {
        let feed = stream.feed();
        let halted = Arc::new(AtomicBool::new(false));
        let interval = self.frame_interval;

        let flag = Arc::clone(&halted);
        thread::Builder::new()
            .name("qrtrust-replay-decoder".into())
            .spawn(move || {
                while !flag.load(Ordering::Acquire) {
                    match feed.next_frame() {
                        Some(frame) => {
                            trace!("Decoding replay frame {}", frame.sequence);
                            sink(Self::decode_frame(&frame));
                        }
                        None => {
                            if !flag.load(Ordering::Acquire) {
                                sink(DecodeEvent::StreamEnded);
                            }
                            break;
                        }
                    }
                    if !interval.is_zero() {
                        thread::sleep(interval);
                    }
                }
            })
            .map_err(|e| DecoderError::StartFailed(e.to_string()))?;

        Ok(Box::new(ReplayControl { halted }))
    }
}

struct ReplayControl {
    halted: Arc<AtomicBool>,
}

impl DecodeControl for ReplayControl {
    fn halt(&mut self) {
        self.halted.store(true, Ordering::Release);
    }
}
