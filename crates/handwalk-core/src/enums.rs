//! Enumeration types used throughout the scene.

use serde::{Deserialize, Serialize};

/// Phase of the two-step gait oscillator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GaitPhase {
    /// Waiting for a positive (index below middle) step.
    #[default]
    Flip,
    /// Waiting for a negative (index above middle) step.
    Flop,
}

impl GaitPhase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            GaitPhase::Flip => GaitPhase::Flop,
            GaitPhase::Flop => GaitPhase::Flip,
        }
    }
}

/// Collider shape the physics host should build for a spawned item.
/// Items without an explicit shape get the host's default (cuboid hull).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColliderShape {
    #[default]
    Cuboid,
    Ball,
    Hull,
    Trimesh,
}

/// Lifecycle of a scene session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Ticks advance gameplay.
    #[default]
    Running,
    /// Torn down; ticks are no-ops.
    Stopped,
}

/// Camera and hand-model setup progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureStatus {
    /// Setup not started.
    #[default]
    Idle,
    /// Waiting on the user-media permission prompt.
    RequestingPermission,
    /// Camera granted; waiting for the stream to produce frames.
    Warming,
    /// Hand model constructed; capture loop may run.
    Ready,
    /// Setup failed; hand-driven progression is disabled.
    Failed,
}

impl CaptureStatus {
    /// Whether the capture loop may be started from this status.
    pub fn is_ready(self) -> bool {
        self == CaptureStatus::Ready
    }
}

/// Instruction for the external animation player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum Playback {
    /// Play (unpaused) at the given time scale.
    Playing { rate: f64 },
    /// Hold the current pose.
    #[default]
    Paused,
}

impl Playback {
    pub fn is_playing(&self) -> bool {
        matches!(self, Playback::Playing { .. })
    }
}
