//! Frame log replay
//!
//! Stands in for a physical camera and QR decoder, the way a disk image
//! stands in for a block device.

mod camera;
mod decoder;
mod frame_log;

pub use camera::{ReplayCamera, ReplayStream};
pub use decoder::ReplayDecoder;
pub use frame_log::{load_log, parse_frame, parse_log, FrameLogError};
