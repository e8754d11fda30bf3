//! Gait system: folds pending bus events into the progress target.

use tracing::debug;

use handwalk_core::events::SceneEvent;
use handwalk_core::types::ProgressState;
use handwalk_gait::fsm::GaitMachine;

use crate::bus::StepSubscription;

/// Drain every pending step event in publication order.
/// Returns the number of steps registered this tick.
pub fn run(
    steps: Option<&StepSubscription>,
    gait: &mut GaitMachine,
    progress: &mut ProgressState,
    events: &mut Vec<SceneEvent>,
) -> u32 {
    let Some(steps) = steps else {
        return 0;
    };

    let mut registered = 0;
    for event in steps.drain() {
        if gait.observe(event) {
            registered += 1;
            progress.target = gait.target();
            debug!(
                delta = event.delta,
                target = progress.target,
                phase = ?gait.phase(),
                "step registered"
            );
            events.push(SceneEvent::StepRegistered {
                target: progress.target,
                phase: gait.phase(),
            });
        }
    }
    registered
}
