//! Simulated camera and host for headless runs.
//!
//! `SimulatedCamera` stands in for the webcam and hand model: it warms up
//! after a few readiness checks and yields a `SimulatedHand` whose index
//! and middle fingertips swing past each other with jitter, like a hand
//! walking in place. `LoggingHost` plays the renderer and physics roles:
//! it logs animation changes and reports items that fell behind the
//! player, the way the boundary sensor would.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use handwalk_core::commands::SceneCommand;
use handwalk_core::constants::{INDEX_FINGER_TIP, MIDDLE_FINGER_TIP};
use handwalk_core::enums::Playback;
use handwalk_core::state::SceneSnapshot;
use handwalk_core::types::{HandObservation, Keypoint};
use handwalk_sim::systems::animation::AnimationPlayer;

use crate::capture::KeypointSource;
use crate::game_loop::SceneHost;
use crate::setup::VideoBackend;

/// Vertical rest position of both fingertips (pixels).
const REST_Y: f64 = 240.0;

/// Knobs for the simulated hand.
#[derive(Debug, Clone)]
pub struct HandMotion {
    /// Peak fingertip separation (pixels).
    pub amplitude: f64,
    /// Frames per full flip-flop cycle.
    pub cycle_frames: u32,
    /// Uniform jitter added to the separation (pixels).
    pub jitter: f64,
    /// Chance that a frame has no detectable hand.
    pub dropout: f64,
    /// Time taken by one inference call.
    pub frame_interval: Duration,
}

impl Default for HandMotion {
    fn default() -> Self {
        Self {
            amplitude: 45.0,
            cycle_frames: 24,
            jitter: 6.0,
            dropout: 0.05,
            frame_interval: Duration::from_millis(33),
        }
    }
}

/// Fake webcam that grants or denies access and warms up over time.
pub struct SimulatedCamera {
    grant_permission: bool,
    warm_after_checks: u32,
    checks: u32,
    released: bool,
    motion: HandMotion,
    seed: u64,
}

impl SimulatedCamera {
    pub fn new(seed: u64, motion: HandMotion) -> Self {
        Self {
            grant_permission: true,
            warm_after_checks: 2,
            checks: 0,
            released: false,
            motion,
            seed,
        }
    }

    /// Camera that refuses permission.
    pub fn denied(seed: u64) -> Self {
        Self {
            grant_permission: false,
            ..Self::new(seed, HandMotion::default())
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl VideoBackend for SimulatedCamera {
    type Source = SimulatedHand;

    async fn request_permission(&mut self) -> anyhow::Result<()> {
        if !self.grant_permission {
            anyhow::bail!("user denied camera access");
        }
        Ok(())
    }

    async fn is_warm(&mut self) -> bool {
        self.checks += 1;
        self.checks > self.warm_after_checks
    }

    async fn build_source(&mut self) -> anyhow::Result<SimulatedHand> {
        Ok(SimulatedHand::new(self.seed, self.motion.clone()))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            info!("simulated camera released");
        }
    }
}

/// Hand keypoints following a noisy sine.
pub struct SimulatedHand {
    rng: ChaCha8Rng,
    frame: u64,
    motion: HandMotion,
}

impl SimulatedHand {
    pub fn new(seed: u64, motion: HandMotion) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            frame: 0,
            motion,
        }
    }

    /// Next frame without waiting.
    pub fn next_frame(&mut self) -> Vec<HandObservation> {
        self.frame += 1;
        if self.rng.gen_bool(self.motion.dropout.clamp(0.0, 1.0)) {
            return Vec::new();
        }

        let cycle = self.motion.cycle_frames.max(2) as f64;
        let angle = std::f64::consts::TAU * self.frame as f64 / cycle;
        let jitter = self.motion.jitter.abs();
        let noise = if jitter > 0.0 {
            self.rng.gen_range(-jitter..=jitter)
        } else {
            0.0
        };
        let separation = self.motion.amplitude * angle.sin() + noise;

        vec![HandObservation::new(vec![
            Keypoint::new(INDEX_FINGER_TIP, 300.0, REST_Y + separation / 2.0),
            Keypoint::new(MIDDLE_FINGER_TIP, 320.0, REST_Y - separation / 2.0),
        ])]
    }
}

impl KeypointSource for SimulatedHand {
    async fn estimate_hands(&mut self) -> anyhow::Result<Vec<HandObservation>> {
        tokio::time::sleep(self.motion.frame_interval).await;
        Ok(self.next_frame())
    }
}

/// Headless renderer/physics stand-in.
pub struct LoggingHost {
    trailing_distance: f32,
    playing: Option<bool>,
    reported: Vec<String>,
}

impl LoggingHost {
    /// Items whose x falls more than `trailing_distance` behind the player
    /// are reported as crossing the boundary.
    pub fn new(trailing_distance: f32) -> Self {
        Self {
            trailing_distance,
            playing: None,
            reported: Vec::new(),
        }
    }
}

impl AnimationPlayer for LoggingHost {
    fn play(&mut self, clip: &str) {
        if self.playing != Some(true) {
            debug!(clip, "walk animation playing");
        }
        self.playing = Some(true);
    }

    fn set_paused(&mut self, clip: &str, paused: bool) {
        if paused && self.playing != Some(false) {
            debug!(clip, "walk animation paused");
            self.playing = Some(false);
        }
    }

    fn set_time_scale(&mut self, clip: &str, scale: f64) {
        trace!(clip, scale, "walk animation rate");
    }
}

impl SceneHost for LoggingHost {
    fn observe(&mut self, snapshot: &SceneSnapshot) -> Vec<SceneCommand> {
        if let Playback::Playing { rate } = snapshot.playback {
            debug!(rate, hand = snapshot.progress.hand_progress, "hand catching up");
        }

        let boundary = snapshot.progress.current as f32 - self.trailing_distance;
        // Commands land on the next tick; skip names already reported.
        self.reported
            .retain(|name| snapshot.entities.iter().any(|e| &e.name == name));

        let mut commands = Vec::new();
        for entity in &snapshot.entities {
            if entity.spawn_position[0] < boundary && !self.reported.contains(&entity.name) {
                debug!(name = %entity.name, "item passed the floor sensor");
                self.reported.push(entity.name.clone());
                commands.push(SceneCommand::DespawnNamed {
                    name: entity.name.clone(),
                });
            }
        }
        commands
    }
}
