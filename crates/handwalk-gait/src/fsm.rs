//! Gait finite state machine.
//!
//! Pure transition function plus a thin stateful wrapper that owns the
//! current phase and the progress target. Each reversal of the fingers
//! registers one step; a gesture held in one direction registers once.

use handwalk_core::enums::GaitPhase;
use handwalk_core::types::StepEvent;

/// Output of one transition evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaitUpdate {
    pub new_phase: GaitPhase,
    /// True when the event completed a half-cycle and the target should advance.
    pub advanced: bool,
}

/// Evaluate the transition rule for one event.
pub fn evaluate(phase: GaitPhase, event: StepEvent) -> GaitUpdate {
    let advanced = match phase {
        GaitPhase::Flip => event.delta > 0.0,
        GaitPhase::Flop => event.delta < 0.0,
    };

    GaitUpdate {
        new_phase: if advanced { phase.next() } else { phase },
        advanced,
    }
}

/// Stateful gait oscillator owning the phase and the progress target.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaitMachine {
    phase: GaitPhase,
    target: f64,
}

impl GaitMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GaitPhase {
        self.phase
    }

    /// Progress requested so far. Only ever grows, by 1 per step.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Feed one event. Returns true if it advanced the target.
    pub fn observe(&mut self, event: StepEvent) -> bool {
        let update = evaluate(self.phase, event);
        if update.advanced {
            self.phase = update.new_phase;
            self.target += 1.0;
        }
        update.advanced
    }

    /// Feed events in order. Returns the number of steps registered.
    pub fn observe_all(&mut self, events: impl IntoIterator<Item = StepEvent>) -> u32 {
        events
            .into_iter()
            .map(|e| self.observe(e))
            .filter(|&advanced| advanced)
            .count() as u32
    }
}
