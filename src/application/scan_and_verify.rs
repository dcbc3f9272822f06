//! Scan and verify use case
//!
//! Runs one scan session and checks the accepted payload. The check starts
//! only after the session has released the camera.

use crate::application::dto::VerificationOutcome;
use crate::application::scan_session_controller::ScanSessionController;
use crate::application::verdict_resolver::ReputationVerdictResolver;
use crate::domain::entities::DecodedPayload;
use crate::domain::repositories::{
    CameraProvider, DecodeCapability, FrameConstraints, ReputationTransport,
};
use anyhow::{Context, Result};
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Scan and verify use case
pub struct ScanAndVerifyUseCase<C: CameraProvider, D: DecodeCapability, T: ReputationTransport> {
    controller: ScanSessionController<C, D>,
    resolver: ReputationVerdictResolver<T>,
}

impl<C: CameraProvider, D: DecodeCapability, T: ReputationTransport> ScanAndVerifyUseCase<C, D, T> {
    /// Creates a new use case
    pub fn new(controller: ScanSessionController<C, D>, resolver: ReputationVerdictResolver<T>) -> Self {
        Self {
            controller,
            resolver,
        }
    }

    /// Waits for the next accepted payload
    ///
    /// Fails if the camera cannot be acquired or the session ends without
    /// accepting a code. Dropping the future stops the session.
    pub async fn scan(&self, constraints: &FrameConstraints) -> Result<DecodedPayload> {
        let (tx, rx) = oneshot::channel();

        self.controller
            .start(
                constraints,
                Box::new(move |payload| {
                    let _ = tx.send(payload);
                }),
            )
            .context("Failed to start scan session")?;

        let guard = StopOnDrop {
            controller: Some(&self.controller),
        };
        let payload = rx.await;
        guard.disarm();

        payload.context("Scan session ended before a QR code was accepted")
    }

    /// Scans one code and checks it
    pub async fn execute(&self, constraints: &FrameConstraints) -> Result<VerificationOutcome> {
        let payload = self.scan(constraints).await?;

        if !payload.is_web_url() {
            info!("Scanned payload is not a web URL, checking it as-is");
        }

        let verdict = self.resolver.check(payload.as_str()).await;
        Ok(VerificationOutcome::new(payload, verdict))
    }

    /// Stops any running session
    pub fn cancel(&self) {
        self.controller.stop();
    }

    pub fn controller(&self) -> &ScanSessionController<C, D> {
        &self.controller
    }

    pub fn resolver(&self) -> &ReputationVerdictResolver<T> {
        &self.resolver
    }
}

/// Stops the session if a pending scan is abandoned
struct StopOnDrop<'a, C: CameraProvider, D: DecodeCapability> {
    controller: Option<&'a ScanSessionController<C, D>>,
}

impl<C: CameraProvider, D: DecodeCapability> StopOnDrop<'_, C, D> {
    fn disarm(mut self) {
        self.controller = None;
    }
}

impl<C: CameraProvider, D: DecodeCapability> Drop for StopOnDrop<'_, C, D> {
    fn drop(&mut self) {
        if let Some(controller) = self.controller.take() {
            debug!("Scan abandoned before a payload arrived");
            controller.stop();
        }
    }
}
