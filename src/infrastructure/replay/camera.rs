//! Replay camera
//!
//! Serves a recorded frame log as if it were a live camera. Each
//! acquisition starts the recording from the beginning.

use super::frame_log::{load_log, FrameLogError};
use crate::domain::repositories::{
    CameraError, CameraProvider, Frame, FrameConstraints, FrameFeed, FrameStream,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Camera backed by a frame log
pub struct ReplayCamera {
    label: String,
    records: Arc<Vec<String>>,
}

impl ReplayCamera {
    /// Loads a frame log from disk
    pub fn from_path(path: &Path) -> Result<Self, FrameLogError> {
        let records = load_log(path)?;
        Ok(Self {
            label: format!("replay:{}", path.display()),
            records: Arc::new(records),
        })
    }

    /// Uses already validated frame records
    pub fn from_records(label: impl Into<String>, records: Vec<String>) -> Self {
        Self {
            label: label.into(),
            records: Arc::new(records),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.records.len()
    }
}

impl CameraProvider for ReplayCamera {
    fn acquire(&self, constraints: &FrameConstraints) -> Result<Box<dyn FrameStream>, CameraError> {
        if self.records.is_empty() {
            return Err(CameraError::NoDevice);
        }

        let frames = self
            .records
            .iter()
            .enumerate()
            .map(|(seq, record)| Frame {
                sequence: seq as u64,
                width: constraints.ideal_width,
                height: constraints.ideal_height,
                data: record.as_bytes().to_vec(),
            })
            .collect();

        debug!("{} acquired with {} frames", self.label, self.records.len());

        Ok(Box::new(ReplayStream {
            label: self.label.clone(),
            feed: Arc::new(ReplayFeed {
                frames: Mutex::new(frames),
                stopped: AtomicBool::new(false),
            }),
            attached: true,
        }))
    }
}

struct ReplayFeed {
    frames: Mutex<VecDeque<Frame>>,
    stopped: AtomicBool,
}

impl FrameFeed for ReplayFeed {
    fn next_frame(&self) -> Option<Frame> {
        if self.stopped.load(Ordering::Acquire) {
            return None;
        }
        self.frames.lock().pop_front()
    }
}

/// Stream over a replayed recording
pub struct ReplayStream {
    label: String,
    feed: Arc<ReplayFeed>,
    attached: bool,
}

impl FrameStream for ReplayStream {
    fn label(&self) -> &str {
        &self.label
    }

    fn feed(&self) -> Arc<dyn FrameFeed> {
        self.feed.clone()
    }

    fn stop_tracks(&mut self) {
        self.feed.stopped.store(true, Ordering::Release);
    }

    fn detach(&mut self) {
        self.attached = false;
    }

    fn reset_target(&mut self) {
        self.feed.frames.lock().clear();
    }
}
