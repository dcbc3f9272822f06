//! Scan session controller
//!
//! Owns the lifecycle of one camera scanning session: acquires the frame
//! stream, runs the decoder against it and turns the noisy per-frame event
//! stream into a single accepted payload. The camera is always released
//! before the payload is handed to the caller.

use crate::domain::entities::{
    Admission, DecodedPayload, FailureDisposition, ScanSession, SessionState,
};
use crate::domain::repositories::{
    CameraError, CameraProvider, DecodeCapability, DecodeControl, DecodeEvent, DecoderError,
    FrameConstraints, FrameSink, FrameStream,
};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Errors that can occur when starting a scan session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(#[from] CameraError),

    #[error("Decoder unavailable: {0}")]
    DecoderUnavailable(#[from] DecoderError),
}

/// Receives the single payload accepted by a session
pub type PayloadCallback = Box<dyn FnOnce(DecodedPayload) + Send>;

struct Inner {
    session: ScanSession,
    next_id: u64,
    /// Stream and decoder are installed once the decoder has started
    armed: bool,
    stream: Option<Box<dyn FrameStream>>,
    control: Option<Box<dyn DecodeControl>>,
    on_payload: Option<PayloadCallback>,
    /// Payload accepted before the session was armed
    pending: Option<DecodedPayload>,
}

impl Inner {
    fn new() -> Self {
        Self {
            session: ScanSession::idle(),
            next_id: 0,
            armed: false,
            stream: None,
            control: None,
            on_payload: None,
            pending: None,
        }
    }

    fn detach_resources(&mut self) -> Teardown {
        self.armed = false;
        Teardown {
            stream: self.stream.take(),
            control: self.control.take(),
        }
    }
}

/// Resources taken out of the session, released outside the lock
struct Teardown {
    stream: Option<Box<dyn FrameStream>>,
    control: Option<Box<dyn DecodeControl>>,
}

impl Teardown {
    fn is_empty(&self) -> bool {
        self.stream.is_none() && self.control.is_none()
    }

    fn run(self) {
        if let Some(mut control) = self.control {
            control.halt();
        }
        if let Some(mut stream) = self.stream {
            release_stream(stream.as_mut());
        }
    }
}

fn release_stream(stream: &mut dyn FrameStream) {
    stream.stop_tracks();
    stream.detach();
    stream.reset_target();
    debug!("Released camera stream {}", stream.label());
}

/// Handle to a started session
#[derive(Clone)]
pub struct ScanSessionHandle {
    id: u64,
    inner: Arc<Mutex<Inner>>,
}

impl ScanSessionHandle {
    /// Returns the session id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether this session is still waiting for a payload
    pub fn is_active(&self) -> bool {
        let inner = self.inner.lock();
        inner.session.id() == self.id && inner.session.is_active()
    }
}

/// Scan session controller
///
/// One controller runs at most one session at a time. Starting a new session
/// while one is live stops the old one first.
pub struct ScanSessionController<C: CameraProvider, D: DecodeCapability> {
    camera: C,
    decoder: D,
    inner: Arc<Mutex<Inner>>,
}

impl<C: CameraProvider, D: DecodeCapability> ScanSessionController<C, D> {
    /// Creates a new controller
    pub fn new(camera: C, decoder: D) -> Self {
        Self {
            camera,
            decoder,
            inner: Arc::new(Mutex::new(Inner::new())),
        }
    }

    /// Starts a scan session
    ///
    /// `on_payload` is invoked at most once, after the camera has been
    /// released. Camera acquisition failure is reported as
    /// [`ScanError::CameraUnavailable`].
    pub fn start(
        &self,
        constraints: &FrameConstraints,
        on_payload: PayloadCallback,
    ) -> Result<ScanSessionHandle, ScanError> {
        self.stop();

        let mut stream = self.camera.acquire(constraints).map_err(|e| {
            warn!("Camera acquisition failed: {}", e);
            ScanError::CameraUnavailable(e)
        })?;

        let id = {
            let mut inner = self.inner.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.session = ScanSession::begin(id);
            inner.armed = false;
            inner.on_payload = Some(on_payload);
            inner.pending = None;
            id
        };

        info!(
            "Scan session {} started on {} ({}x{})",
            id,
            stream.label(),
            constraints.ideal_width,
            constraints.ideal_height
        );

        let sink = frame_sink(Arc::downgrade(&self.inner), id);
        let control = match self.decoder.decode_continuously(stream.as_ref(), sink) {
            Ok(control) => control,
            Err(e) => {
                release_stream(stream.as_mut());
                let mut inner = self.inner.lock();
                if inner.session.id() == id {
                    inner.session.end();
                    inner.on_payload = None;
                }
                warn!("Decoder failed to start for session {}: {}", id, e);
                return Err(ScanError::DecoderUnavailable(e));
            }
        };

        self.arm(id, stream, control);

        Ok(ScanSessionHandle {
            id,
            inner: Arc::clone(&self.inner),
        })
    }

    /// Installs the stream and decoder, unless the session already ended
    fn arm(&self, id: u64, stream: Box<dyn FrameStream>, control: Box<dyn DecodeControl>) {
        let deferred = {
            let mut inner = self.inner.lock();
            if inner.session.id() == id && inner.session.is_active() {
                inner.stream = Some(stream);
                inner.control = Some(control);
                inner.armed = true;
                return;
            }

            let payload = if inner.session.id() == id {
                inner.pending.take()
            } else {
                None
            };
            let callback = payload.as_ref().and_then(|_| inner.on_payload.take());
            (payload, callback)
        };

        Teardown {
            stream: Some(stream),
            control: Some(control),
        }
        .run();

        if let (Some(payload), Some(callback)) = deferred {
            hand_off(&self.inner, id, payload, callback);
        }
    }

    /// Stops the current session
    ///
    /// Idempotent; a no-op when nothing is running. Events still in flight
    /// from the decoder are dropped afterwards.
    pub fn stop(&self) {
        let (id, teardown) = {
            let mut inner = self.inner.lock();
            let was_active = inner.session.is_active();
            inner.session.end();
            inner.on_payload = None;
            inner.pending = None;
            let teardown = inner.detach_resources();
            if !was_active && teardown.is_empty() {
                return;
            }
            (inner.session.id(), teardown)
        };

        teardown.run();
        info!("Scan session {} stopped", id);
    }

    /// Snapshot of the current session
    pub fn session(&self) -> ScanSession {
        self.inner.lock().session.clone()
    }

    /// Lifecycle position of the current session
    pub fn state(&self) -> SessionState {
        self.inner.lock().session.state()
    }

    /// Whether a session is waiting for a payload
    pub fn is_scanning(&self) -> bool {
        self.inner.lock().session.is_active()
    }
}

impl<C: CameraProvider, D: DecodeCapability> Drop for ScanSessionController<C, D> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn frame_sink(inner: Weak<Mutex<Inner>>, id: u64) -> FrameSink {
    Arc::new(move |event: DecodeEvent| {
        if let Some(inner) = inner.upgrade() {
            on_frame(&inner, id, event);
        }
    })
}

/// Decode callback: applies the suppression rules to one event
fn on_frame(inner: &Arc<Mutex<Inner>>, id: u64, event: DecodeEvent) {
    match event {
        DecodeEvent::Decoded(text) => on_decoded(inner, id, text),
        DecodeEvent::Failed(failure) => {
            let disposition = inner.lock().session.record_failure(id, failure.kind);
            match disposition {
                FailureDisposition::Reported => {
                    warn!("Decode error in session {}: {}", id, failure.message);
                }
                FailureDisposition::Suppressed | FailureDisposition::Ignored => {}
            }
        }
        DecodeEvent::StreamEnded => {
            let teardown = {
                let mut inner = inner.lock();
                if inner.session.id() != id || !inner.session.is_active() {
                    return;
                }
                inner.session.end();
                inner.on_payload = None;
                inner.detach_resources()
            };
            teardown.run();
            info!("Scan session {} ended: frame source exhausted", id);
        }
    }
}

fn on_decoded(inner: &Arc<Mutex<Inner>>, id: u64, text: String) {
    let delivery = {
        let mut guard = inner.lock();
        match guard.session.offer(id, &text) {
            Admission::Accepted => {}
            admission => {
                trace!("Dropped payload in session {}: {:?}", id, admission);
                return;
            }
        }

        let payload = DecodedPayload::new(text);
        if !guard.armed {
            debug!("Session {} accepted a payload before arming", id);
            guard.pending = Some(payload);
            return;
        }

        let teardown = guard.detach_resources();
        (payload, guard.on_payload.take(), teardown)
    };

    let (payload, callback, teardown) = delivery;
    teardown.run();
    info!("Scan session {} accepted a payload", id);

    match callback {
        Some(callback) => hand_off(inner, id, payload, callback),
        None => finish(inner, id),
    }
}

fn hand_off(inner: &Arc<Mutex<Inner>>, id: u64, payload: DecodedPayload, callback: PayloadCallback) {
    callback(payload);
    finish(inner, id);
}

fn finish(inner: &Arc<Mutex<Inner>>, id: u64) {
    let mut inner = inner.lock();
    if inner.session.id() == id {
        inner.session.finish_processing();
    }
}
