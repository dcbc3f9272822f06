//! Test doubles for the camera, decoder and reputation ports

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use qrtrust::domain::entities::DecodedPayload;
use qrtrust::domain::repositories::{
    CameraError, CameraProvider, DecodeCapability, DecodeControl, DecodeEvent, DecoderError,
    Frame, FrameConstraints, FrameFeed, FrameSink, FrameStream, ReputationResponse,
    ReputationTransport, TransportError,
};
use qrtrust::application::PayloadCallback;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared record of what happened to camera streams
#[derive(Default)]
pub struct CameraLog {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub steps: Mutex<Vec<&'static str>>,
    pub last_constraints: Mutex<Option<FrameConstraints>>,
}

impl CameraLog {
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn live_streams(&self) -> usize {
        self.acquired() - self.released()
    }
}

pub struct FakeCamera {
    pub log: Arc<CameraLog>,
    failure: Option<CameraError>,
}

impl FakeCamera {
    pub fn new() -> Self {
        Self {
            log: Arc::new(CameraLog::default()),
            failure: None,
        }
    }

    pub fn denied() -> Self {
        Self {
            log: Arc::new(CameraLog::default()),
            failure: Some(CameraError::PermissionDenied("user dismissed prompt".into())),
        }
    }
}

impl CameraProvider for FakeCamera {
    fn acquire(&self, constraints: &FrameConstraints) -> Result<Box<dyn FrameStream>, CameraError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        *self.log.last_constraints.lock() = Some(constraints.clone());
        self.log.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            log: Arc::clone(&self.log),
        }))
    }
}

struct EmptyFeed;

impl FrameFeed for EmptyFeed {
    fn next_frame(&self) -> Option<Frame> {
        None
    }
}

pub struct FakeStream {
    log: Arc<CameraLog>,
}

impl FrameStream for FakeStream {
    fn label(&self) -> &str {
        "fake camera"
    }

    fn feed(&self) -> Arc<dyn FrameFeed> {
        Arc::new(EmptyFeed)
    }

    fn stop_tracks(&mut self) {
        self.log.steps.lock().push("stop_tracks");
    }

    fn detach(&mut self) {
        self.log.steps.lock().push("detach");
    }

    fn reset_target(&mut self) {
        self.log.steps.lock().push("reset_target");
        self.log.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Decoder whose events are pushed by the test
#[derive(Default)]
pub struct DecoderLog {
    pub sinks: Mutex<Vec<FrameSink>>,
    pub halted: AtomicUsize,
}

impl DecoderLog {
    /// Delivers an event through the most recent session's sink
    pub fn emit(&self, event: DecodeEvent) {
        let sink = self.sinks.lock().last().cloned();
        if let Some(sink) = sink {
            sink(event);
        }
    }

    /// Delivers an event through the sink of the `index`th session
    pub fn emit_to(&self, index: usize, event: DecodeEvent) {
        let sink = self.sinks.lock().get(index).cloned();
        if let Some(sink) = sink {
            sink(event);
        }
    }

    pub fn decoded(&self, text: &str) {
        self.emit(DecodeEvent::Decoded(text.to_string()));
    }

    pub fn halted(&self) -> usize {
        self.halted.load(Ordering::SeqCst)
    }
}

pub struct FakeDecoder {
    pub log: Arc<DecoderLog>,
    fail: bool,
}

impl FakeDecoder {
    pub fn new() -> Self {
        Self {
            log: Arc::new(DecoderLog::default()),
            fail: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            log: Arc::new(DecoderLog::default()),
            fail: true,
        }
    }
}

struct FakeControl {
    log: Arc<DecoderLog>,
}

impl DecodeControl for FakeControl {
    fn halt(&mut self) {
        self.log.halted.fetch_add(1, Ordering::SeqCst);
    }
}

impl DecodeCapability for FakeDecoder {
    fn decode_continuously(
        &self,
        _stream: &dyn FrameStream,
        sink: FrameSink,
    ) -> Result<Box<dyn DecodeControl>, DecoderError> {
        if self.fail {
            return Err(DecoderError::StartFailed("no decoder available".into()));
        }
        self.log.sinks.lock().push(sink);
        Ok(Box::new(FakeControl {
            log: Arc::clone(&self.log),
        }))
    }
}

/// Decoder that delivers a scripted burst of events before returning
pub struct EagerDecoder {
    pub log: Arc<DecoderLog>,
    script: Vec<DecodeEvent>,
}

impl EagerDecoder {
    pub fn new(script: Vec<DecodeEvent>) -> Self {
        Self {
            log: Arc::new(DecoderLog::default()),
            script,
        }
    }
}

impl DecodeCapability for EagerDecoder {
    fn decode_continuously(
        &self,
        _stream: &dyn FrameStream,
        sink: FrameSink,
    ) -> Result<Box<dyn DecodeControl>, DecoderError> {
        for event in &self.script {
            sink(event.clone());
        }
        self.log.sinks.lock().push(sink);
        Ok(Box::new(FakeControl {
            log: Arc::clone(&self.log),
        }))
    }
}

/// Collects delivered payloads
#[derive(Clone, Default)]
pub struct Delivered(pub Arc<Mutex<Vec<String>>>);

impl Delivered {
    pub fn callback(&self) -> PayloadCallback {
        let inner = Arc::clone(&self.0);
        Box::new(move |payload: DecodedPayload| inner.lock().push(payload.into_inner()))
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().len()
    }
}

/// Transport returning a canned result
pub struct FakeTransport {
    result: Result<ReputationResponse, TransportError>,
    pub calls: AtomicUsize,
    pub urls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn responding(body: Value) -> Self {
        Self::with_result(Ok(ReputationResponse::new(body)))
    }

    pub fn failing(error: TransportError) -> Self {
        Self::with_result(Err(error))
    }

    pub fn with_result(result: Result<ReputationResponse, TransportError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReputationTransport for FakeTransport {
    async fn lookup(&self, url: &str) -> Result<ReputationResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().push(url.to_string());
        self.result.clone()
    }
}
