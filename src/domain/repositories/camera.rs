//! Camera provider trait
//!
//! Defines how a scan session acquires and releases a live frame stream.

use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when acquiring a camera
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("No camera device responded")]
    NoDevice,

    #[error("Camera error: {0}")]
    Other(String),
}

/// Which way the requested camera should face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Rear camera, pointed at the scene
    #[default]
    Environment,
    /// Front camera, pointed at the user
    User,
}

/// Constraints passed to the camera when acquiring a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConstraints {
    /// Requested facing mode
    pub facing: FacingMode,
    /// Ideal frame width in pixels
    pub ideal_width: u32,
    /// Ideal frame height in pixels
    pub ideal_height: u32,
}

impl Default for FrameConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

impl FrameConstraints {
    /// Sets the facing mode
    pub fn with_facing(mut self, facing: FacingMode) -> Self {
        self.facing = facing;
        self
    }

    /// Sets the ideal resolution
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.ideal_width = width;
        self.ideal_height = height;
        self
    }
}

/// One captured video frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Position of the frame in the stream
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    /// Raw frame contents, format defined by the stream
    pub data: Vec<u8>,
}

/// Read side of a live stream, shared with the decoder
pub trait FrameFeed: Send + Sync {
    /// Returns the next frame, or `None` once the stream has ended or its
    /// tracks were stopped
    fn next_frame(&self) -> Option<Frame>;
}

/// An exclusively owned live camera stream
///
/// Releasing a stream is three steps, always performed in order by the
/// scan controller: stop the tracks, detach from the video target, reset
/// the target.
pub trait FrameStream: Send {
    /// Human-readable description of the device
    fn label(&self) -> &str;

    /// Returns the feed a decoder reads frames from
    fn feed(&self) -> Arc<dyn FrameFeed>;

    /// Stops every media track of the stream
    fn stop_tracks(&mut self);

    /// Detaches the stream from its video target
    fn detach(&mut self);

    /// Forces the video target to reset so no stale frame stays visible
    fn reset_target(&mut self);
}

/// Trait for acquiring camera streams
///
/// # Example
///
/// ```ignore
/// let stream = camera.acquire(&FrameConstraints::default())?;
/// println!("Scanning with {}", stream.label());
/// ```
pub trait CameraProvider: Send + Sync {
    /// Requests a live stream matching `constraints`
    fn acquire(&self, constraints: &FrameConstraints) -> Result<Box<dyn FrameStream>, CameraError>;
}
