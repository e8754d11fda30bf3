//! Fundamental input and progress types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DISTANCE_DISPLAY_DIVISOR, DISTANCE_DISPLAY_SCALE, INDEX_FINGER_TIP, MIDDLE_FINGER_TIP,
    SPAWN_NAME_PREFIX,
};

/// A named 2D landmark reported by the hand model (pixel units, y grows downward).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
        }
    }
}

/// One recognized hand as returned by the inference collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandObservation {
    pub keypoints: Vec<Keypoint>,
}

impl HandObservation {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Look up a keypoint by name.
    pub fn keypoint(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.name == name)
    }

    /// Extract the fingertip pair used for step detection.
    /// Returns `None` if either fingertip is missing.
    pub fn fingertips(&self) -> Option<KeypointFrame> {
        let index = self.keypoint(INDEX_FINGER_TIP)?;
        let middle = self.keypoint(MIDDLE_FINGER_TIP)?;
        Some(KeypointFrame {
            index_tip_y: index.y,
            middle_tip_y: middle.y,
        })
    }
}

/// Vertical fingertip positions for a single captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeypointFrame {
    pub index_tip_y: f64,
    pub middle_tip_y: f64,
}

impl KeypointFrame {
    pub fn new(index_tip_y: f64, middle_tip_y: f64) -> Self {
        Self {
            index_tip_y,
            middle_tip_y,
        }
    }

    /// Signed separation of the two fingertips.
    pub fn delta(&self) -> f64 {
        self.index_tip_y - self.middle_tip_y
    }
}

/// A discrete step signal published on the `finger-step` channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepEvent {
    #[serde(rename = "stepDiff")]
    pub delta: f64,
}

impl StepEvent {
    pub fn new(delta: f64) -> Self {
        Self { delta }
    }
}

/// Target and smoothed scene progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Smoothed progress actually rendered.
    pub current: f64,
    /// Progress requested by completed gait steps.
    pub target: f64,
}

impl ProgressState {
    pub fn new(current: f64, target: f64) -> Self {
        Self { current, target }
    }

    /// Remaining distance from `current` to `target`.
    pub fn gap(&self) -> f64 {
        self.target - self.current
    }

    /// Distance readout in meters, truncated to millimeters.
    pub fn distance_m(&self) -> f64 {
        (self.current * DISTANCE_DISPLAY_SCALE).floor() / DISTANCE_DISPLAY_DIVISOR
    }

    /// Distance readout formatted for display.
    pub fn distance_label(&self) -> String {
        format!("{:.3}m", self.distance_m())
    }
}

/// Identity of a spawned entity, unique for the lifetime of its pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl InstanceId {
    /// Name given to the entity's rigid body, as reported back by the boundary sensor.
    pub fn name(&self) -> String {
        format!("{SPAWN_NAME_PREFIX}{}", self.0)
    }

    /// Parse a rigid body name produced by [`InstanceId::name`].
    pub fn parse_name(name: &str) -> Option<Self> {
        name.strip_prefix(SPAWN_NAME_PREFIX)?
            .parse::<u64>()
            .ok()
            .map(InstanceId)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SPAWN_NAME_PREFIX}{}", self.0)
    }
}

/// Scene time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed scene time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
