//! Step detection from fingertip keypoints.
//!
//! Pure functions with no state: each captured frame either yields a step
//! event or nothing. A sustained gesture yields the same event every frame;
//! edge handling is left to the gait machine.

use handwalk_core::config::DetectorConfig;
use handwalk_core::types::{HandObservation, KeypointFrame, StepEvent};

/// Debounced step detector with a configurable dead-zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepDetector {
    threshold: f64,
}

impl StepDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.step_threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify one frame. Absent frames and neutral poses yield nothing.
    pub fn detect(&self, frame: Option<KeypointFrame>) -> Option<StepEvent> {
        detect(frame?, self.threshold)
    }

    /// Classify the first recognized hand of an inference result.
    /// Additional hands are ignored.
    pub fn detect_hands(&self, hands: &[HandObservation]) -> Option<StepEvent> {
        self.detect(hands.first().and_then(HandObservation::fingertips))
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}

/// Separation at or beyond `|threshold|` is a step; anything inside the dead-zone is not.
pub fn detect(frame: KeypointFrame, threshold: f64) -> Option<StepEvent> {
    let delta = frame.delta();
    if !delta.is_finite() || delta.abs() < threshold.abs() {
        return None;
    }
    Some(StepEvent::new(delta))
}
