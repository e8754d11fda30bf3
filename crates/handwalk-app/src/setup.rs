//! Camera setup state machine.
//!
//! `Idle → RequestingPermission → Warming → Ready | Failed`. Warming polls
//! the backend's readiness check with exponential backoff instead of a
//! fixed delay. `Ready` and `Failed` are terminal; failure only disables
//! hand input, the scene keeps running.

use std::future::Future;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use handwalk_core::config::CaptureConfig;
use handwalk_core::enums::CaptureStatus;

use crate::capture::KeypointSource;

/// Camera and inference model provider.
pub trait VideoBackend: Send {
    type Source: KeypointSource + 'static;

    /// Ask for camera access.
    fn request_permission(&mut self) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Whether the video stream is delivering frames yet.
    fn is_warm(&mut self) -> impl Future<Output = bool> + Send;

    /// Load the hand model bound to the running stream.
    fn build_source(&mut self) -> impl Future<Output = anyhow::Result<Self::Source>> + Send;

    /// Stop the stream and free the device. Safe to call more than once.
    fn release(&mut self);
}

/// Delays between readiness checks: doubling from the initial delay, capped.
pub fn backoff_delays(config: &CaptureConfig) -> impl Iterator<Item = Duration> {
    let max = config.warmup_max_ms.max(config.warmup_initial_ms);
    let mut next = config.warmup_initial_ms;
    (0..config.warmup_attempts).map(move |_| {
        let delay = next.min(max);
        next = next.saturating_mul(2);
        Duration::from_millis(delay)
    })
}

/// Drives a backend through setup and publishes status changes.
pub struct CaptureSetup {
    config: CaptureConfig,
    status: watch::Sender<CaptureStatus>,
}

impl CaptureSetup {
    pub fn new(config: CaptureConfig) -> Self {
        let (status, _) = watch::channel(CaptureStatus::Idle);
        Self { config, status }
    }

    pub fn status(&self) -> CaptureStatus {
        *self.status.borrow()
    }

    /// Receiver that sees every later status change.
    pub fn watch(&self) -> watch::Receiver<CaptureStatus> {
        self.status.subscribe()
    }

    /// Run setup to completion. Returns the keypoint source when `Ready`.
    /// On failure the camera is released right away. Only runs from `Idle`;
    /// a finished setup returns `None`.
    pub async fn run<B: VideoBackend>(&self, backend: &mut B) -> Option<B::Source> {
        if self.status() != CaptureStatus::Idle {
            debug!(status = ?self.status(), "capture setup already ran");
            return None;
        }
        match self.drive(backend).await {
            Ok(source) => {
                self.transition(CaptureStatus::Ready);
                Some(source)
            }
            Err(e) => {
                warn!("camera unavailable, hand input disabled: {e:#}");
                backend.release();
                self.transition(CaptureStatus::Failed);
                None
            }
        }
    }

    async fn drive<B: VideoBackend>(&self, backend: &mut B) -> anyhow::Result<B::Source> {
        self.transition(CaptureStatus::RequestingPermission);
        backend
            .request_permission()
            .await
            .context("camera permission denied")?;

        self.transition(CaptureStatus::Warming);
        let mut warm = backend.is_warm().await;
        for delay in backoff_delays(&self.config) {
            if warm {
                break;
            }
            debug!(delay_ms = delay.as_millis() as u64, "camera warming");
            tokio::time::sleep(delay).await;
            warm = backend.is_warm().await;
        }
        if !warm {
            anyhow::bail!(
                "camera not ready after {} checks",
                self.config.warmup_attempts + 1
            );
        }

        backend
            .build_source()
            .await
            .context("failed to load hand model")
    }

    fn transition(&self, next: CaptureStatus) {
        let previous = self.status.send_replace(next);
        info!(from = ?previous, to = ?next, "capture status");
    }
}
