//! Progress smoothing: a quantized exponential approach of `current` toward `target`.
//!
//! Each tick closes 1/divisor of the gap, truncated to 1/quantum units so the
//! approach cannot creep forever on float residue. Once the truncated step
//! reaches zero (gap below divisor/quantum) a small settle step finishes the
//! approach. The result never passes `target`.

use handwalk_core::config::SmoothingConfig;
use handwalk_core::types::ProgressState;

/// Discrete convergence filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSmoother {
    divisor: f64,
    quantum: f64,
    settle_step: f64,
}

impl ProgressSmoother {
    pub fn new(config: &SmoothingConfig) -> Self {
        Self {
            divisor: config.divisor,
            quantum: config.quantum,
            settle_step: config.settle_step,
        }
    }

    /// Quantized increment for a given gap, before settling.
    pub fn increment(&self, gap: f64) -> f64 {
        (self.quantum * gap / self.divisor).floor() / self.quantum
    }

    /// One tick of the filter.
    pub fn advance(&self, state: ProgressState) -> ProgressState {
        let gap = state.gap();
        // Zero, negative, and NaN gaps leave the state untouched.
        if gap.is_nan() || gap <= 0.0 {
            return state;
        }

        let quantized = self.increment(gap);
        let step = if quantized > 0.0 {
            quantized
        } else {
            gap.min(self.settle_step)
        };

        ProgressState {
            current: (state.current + step).min(state.target),
            target: state.target,
        }
    }
}

impl Default for ProgressSmoother {
    fn default() -> Self {
        Self::new(&SmoothingConfig::default())
    }
}

/// One tick with the default constants.
pub fn advance(state: ProgressState) -> ProgressState {
    ProgressSmoother::default().advance(state)
}
