//! Tunable scene configuration.
//!
//! Every field defaults to the matching value in [`crate::constants`], so a
//! config file only needs to name what it overrides.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Step detector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Dead-zone for fingertip separation (pixel units).
    pub step_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            step_threshold: STEP_THRESHOLD,
        }
    }
}

/// Progress smoother settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub divisor: f64,
    pub quantum: f64,
    /// Step taken once the quantized increment rounds to zero. 0 disables settling.
    pub settle_step: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            divisor: SMOOTHING_DIVISOR,
            quantum: SMOOTHING_QUANTUM,
            settle_step: SMOOTHING_SETTLE_STEP,
        }
    }
}

/// Hand animation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub clip: String,
    pub catch_up_gap: f64,
    pub marker_step: f64,
    pub rate_factor: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            clip: ANIMATION_CLIP.to_string(),
            catch_up_gap: ANIMATION_CATCH_UP_GAP,
            marker_step: ANIMATION_MARKER_STEP,
            rate_factor: ANIMATION_RATE_FACTOR,
        }
    }
}

/// Spawn pool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub max_capacity: usize,
    /// A uniform draw in [0, 1) must exceed this to spawn.
    pub probability_threshold: f64,
    pub ahead_offset: f32,
    pub spawn_height: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            max_capacity: SPAWN_MAX_CAPACITY,
            probability_threshold: SPAWN_PROBABILITY_THRESHOLD,
            ahead_offset: SPAWN_AHEAD_OFFSET,
            spawn_height: SPAWN_HEIGHT,
        }
    }
}

/// Camera setup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub warmup_initial_ms: u64,
    pub warmup_max_ms: u64,
    pub warmup_attempts: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            warmup_initial_ms: CAPTURE_WARMUP_INITIAL_MS,
            warmup_max_ms: CAPTURE_WARMUP_MAX_MS,
            warmup_attempts: CAPTURE_WARMUP_ATTEMPTS,
        }
    }
}

/// Complete scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub tick_rate: u32,
    pub detector: DetectorConfig,
    pub smoothing: SmoothingConfig,
    pub animation: AnimationConfig,
    pub spawn: SpawnConfig,
    pub capture: CaptureConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            detector: DetectorConfig::default(),
            smoothing: SmoothingConfig::default(),
            animation: AnimationConfig::default(),
            spawn: SpawnConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

/// Failure to read a config file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl SceneConfig {
    /// Parse a JSON config and normalize it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        Ok(config.validated())
    }

    /// Read a JSON config file and normalize it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json(&contents)
    }

    /// Clamp values into ranges the systems can work with.
    pub fn validated(mut self) -> Self {
        self.tick_rate = self.tick_rate.max(1);

        self.detector.step_threshold = self.detector.step_threshold.abs();

        if !(self.smoothing.divisor.is_finite() && self.smoothing.divisor >= 1.0) {
            self.smoothing.divisor = SMOOTHING_DIVISOR;
        }
        if !(self.smoothing.quantum.is_finite() && self.smoothing.quantum > 0.0) {
            self.smoothing.quantum = SMOOTHING_QUANTUM;
        }
        self.smoothing.settle_step = self.smoothing.settle_step.max(0.0);

        self.animation.catch_up_gap = self.animation.catch_up_gap.max(0.0);
        self.animation.marker_step = self.animation.marker_step.max(0.0);
        self.animation.rate_factor = self.animation.rate_factor.max(0.0);

        self.spawn.probability_threshold = self.spawn.probability_threshold.clamp(0.0, 1.0);

        self.capture.warmup_max_ms = self.capture.warmup_max_ms.max(self.capture.warmup_initial_ms);
        self
    }

    /// Seconds per tick at the configured rate.
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate.max(1) as f64
    }
}
