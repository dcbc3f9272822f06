//! Repository traits (interfaces)
//!
//! These traits define the contracts for the external collaborators: the
//! camera, the QR decoder and the reputation service. They follow the
//! Dependency Inversion Principle (DIP) from SOLID.

mod camera;
mod decoder;
mod reputation;

pub use camera::{
    CameraError, CameraProvider, FacingMode, Frame, FrameConstraints, FrameFeed, FrameStream,
};
pub use decoder::{DecodeCapability, DecodeControl, DecodeEvent, DecodeFailure, DecoderError, FrameSink};
pub use reputation::{ReputationResponse, ReputationTransport, RequestQuota, TransportError};
