//! Scan session entity
//!
//! Holds the suppression flags of one camera scanning session and decides
//! which decoded frames get through.

use super::decode::DecodeErrorKind;
use serde::Serialize;

/// Counters collected over the life of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Frames reported by the decoder while the session was active
    pub frames_analyzed: u64,
    /// No-detection and checksum frames swallowed
    pub noise_suppressed: u64,
    /// Unexpected decode errors
    pub decode_errors: u64,
    /// Decoded payloads dropped by suppression
    pub payloads_dropped: u64,
}

/// Lifecycle position of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Active,
    Processing,
}

/// Outcome of offering a decoded payload to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First valid payload; the session is now processing it
    Accepted,
    /// Session already ended, or the event belongs to another session
    Inactive,
    /// A payload is already being handled
    Busy,
    /// Same text as the payload just accepted
    Duplicate,
}

/// What to do with a decode failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Session is not active; drop silently
    Ignored,
    /// Expected noise; drop silently
    Suppressed,
    /// Unexpected; worth a diagnostic
    Reported,
}

/// State of one scanning session
///
/// Sessions are identified by a controller-assigned id so that events from
/// a superseded decoder can never touch the current session.
/// Invariant: `processing` implies `!active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSession {
    id: u64,
    active: bool,
    processing: bool,
    last_accepted_payload: Option<String>,
    stats: SessionStats,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::idle()
    }
}

impl ScanSession {
    /// A session that was never started
    pub fn idle() -> Self {
        Self {
            id: 0,
            active: false,
            processing: false,
            last_accepted_payload: None,
            stats: SessionStats::default(),
        }
    }

    /// A fresh, active session; carries nothing over from earlier sessions
    pub fn begin(id: u64) -> Self {
        Self {
            id,
            active: true,
            ..Self::idle()
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn last_accepted_payload(&self) -> Option<&str> {
        self.last_accepted_payload.as_deref()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Returns the lifecycle position
    pub fn state(&self) -> SessionState {
        if self.processing {
            SessionState::Processing
        } else if self.active {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    /// Offers a decoded payload from session `session_id`
    ///
    /// Checks run in order: inactive, busy, duplicate. On acceptance the
    /// session stops accepting anything further.
    pub fn offer(&mut self, session_id: u64, text: &str) -> Admission {
        if session_id != self.id || !self.active {
            return Admission::Inactive;
        }
        self.stats.frames_analyzed += 1;

        if self.processing {
            self.stats.payloads_dropped += 1;
            return Admission::Busy;
        }
        if self.last_accepted_payload.as_deref() == Some(text) {
            self.stats.payloads_dropped += 1;
            return Admission::Duplicate;
        }

        self.processing = true;
        self.last_accepted_payload = Some(text.to_string());
        self.active = false;
        Admission::Accepted
    }

    /// Records a decode failure from session `session_id`
    pub fn record_failure(&mut self, session_id: u64, kind: DecodeErrorKind) -> FailureDisposition {
        if session_id != self.id || !self.active {
            return FailureDisposition::Ignored;
        }
        self.stats.frames_analyzed += 1;

        if kind.is_noise() {
            self.stats.noise_suppressed += 1;
            FailureDisposition::Suppressed
        } else {
            self.stats.decode_errors += 1;
            FailureDisposition::Reported
        }
    }

    /// Marks the accepted payload as handed off
    pub fn finish_processing(&mut self) {
        self.processing = false;
    }

    /// Ends the session without a payload
    pub fn end(&mut self) {
        self.active = false;
    }
}
