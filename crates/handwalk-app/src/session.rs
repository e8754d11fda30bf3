//! Session lifecycle: start everything, tear everything down.
//!
//! Start order: build the engine and attach it to a fresh bus, start the
//! game loop thread, then run camera setup while the scene already ticks.
//! Teardown order: stop the capture loop, release the camera, stop and join
//! the game loop. A capture loop stuck in an inference call is waited on
//! for a short grace period, then left to finish on its own; its result is
//! dropped when it lands.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{anyhow, Context};
use tokio::sync::watch;
use tokio::task;
use tracing::{info, warn};

use handwalk_core::catalog::Catalog;
use handwalk_core::commands::SceneCommand;
use handwalk_core::constants::CAPTURE_STOP_GRACE_MS;
use handwalk_core::enums::CaptureStatus;
use handwalk_core::state::SceneSnapshot;
use handwalk_gait::detector::StepDetector;
use handwalk_sim::bus::StepEventBus;
use handwalk_sim::engine::{SceneEngine, SimConfig};

use crate::capture::{run_capture_loop, CaptureStats};
use crate::game_loop::{spawn_game_loop, SceneHost};
use crate::setup::{CaptureSetup, VideoBackend};
use crate::state::{GameLoopCommand, LatestSnapshot};

/// A running scene with its capture pipeline.
pub struct Session<B: VideoBackend> {
    bus: StepEventBus,
    backend: B,
    capture_status: CaptureStatus,
    capture_task: Option<task::JoinHandle<CaptureStats>>,
    shutdown_tx: watch::Sender<bool>,
    command_tx: mpsc::Sender<GameLoopCommand>,
    game_loop: Option<JoinHandle<()>>,
    latest_snapshot: LatestSnapshot,
}

impl<B: VideoBackend> Session<B> {
    /// Start the scene, then bring up the camera. A camera failure is
    /// logged and leaves the scene running without hand input.
    pub async fn start<H>(config: SimConfig, catalog: Catalog, mut backend: B, host: H) -> Self
    where
        H: SceneHost + 'static,
    {
        let bus = StepEventBus::new();
        let detector = StepDetector::from_config(&config.scene.detector);
        let setup = CaptureSetup::new(config.scene.capture.clone());

        let mut engine = SceneEngine::new(config, catalog);
        engine.attach(&bus);

        let latest_snapshot = LatestSnapshot::new();
        let (command_tx, game_loop) = spawn_game_loop(engine, host, latest_snapshot.clone());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let capture_task = setup.run(&mut backend).await.map(|source| {
            tokio::spawn(run_capture_loop(source, bus.clone(), detector, shutdown_rx))
        });
        let capture_status = setup.status();
        info!(capture = ?capture_status, "session started");

        Self {
            bus,
            backend,
            capture_status,
            capture_task,
            shutdown_tx,
            command_tx,
            game_loop: Some(game_loop),
            latest_snapshot,
        }
    }

    /// Final status of camera setup.
    pub fn capture_status(&self) -> CaptureStatus {
        self.capture_status
    }

    /// The session's step channel. Extra subscribers may attach here.
    pub fn bus(&self) -> &StepEventBus {
        &self.bus
    }

    pub fn latest_snapshot(&self) -> Option<SceneSnapshot> {
        self.latest_snapshot.get()
    }

    /// Forward a host command to the scene.
    pub fn send(&self, command: SceneCommand) -> anyhow::Result<()> {
        self.command_tx
            .send(GameLoopCommand::Scene(command))
            .map_err(|_| anyhow!("game loop is not running"))
    }

    /// Tear down in order and return the final snapshot.
    pub async fn teardown(mut self) -> anyhow::Result<Option<SceneSnapshot>> {
        // (a) No further inference calls; an in-flight one finishes and is ignored.
        let _ = self.shutdown_tx.send(true);
        if let Some(capture) = self.capture_task.take() {
            let grace = Duration::from_millis(CAPTURE_STOP_GRACE_MS);
            match tokio::time::timeout(grace, capture).await {
                Ok(Ok(stats)) => info!(frames = stats.frames, "capture stopped"),
                Ok(Err(e)) => warn!(error = %e, "capture task ended abnormally"),
                // Dropping the handle detaches the task.
                Err(_) => warn!(
                    grace_ms = CAPTURE_STOP_GRACE_MS,
                    "inference still in flight, leaving capture task behind"
                ),
            }
        }

        // (b) Free the camera.
        self.backend.release();

        // (c) Stop the scene.
        let _ = self.command_tx.send(GameLoopCommand::Shutdown);
        if let Some(game_loop) = self.game_loop.take() {
            task::spawn_blocking(move || game_loop.join())
                .await
                .context("failed to join game loop")?
                .map_err(|_| anyhow!("game loop thread panicked"))?;
        }

        info!("session torn down");
        Ok(self.latest_snapshot.get())
    }
}
