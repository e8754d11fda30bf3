//! Snapshot builder: assembles the host-visible scene state after a tick.

use handwalk_core::enums::{GaitPhase, Playback, SessionPhase};
use handwalk_core::events::SceneEvent;
use handwalk_core::state::{ProgressView, SceneSnapshot};
use handwalk_core::types::{ProgressState, SimTime};

use crate::systems::effect::Effect;
use crate::systems::layout;
use crate::systems::spawn_pool::SpawnPool;

/// Everything the snapshot reads, borrowed from the engine.
pub struct SnapshotInputs<'a> {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub gait_phase: GaitPhase,
    pub progress: ProgressState,
    pub hand_progress: f64,
    pub playback: Playback,
    pub pool: &'a SpawnPool,
    pub effect: &'a Effect,
}

pub fn build_snapshot(inputs: SnapshotInputs<'_>, events: Vec<SceneEvent>) -> SceneSnapshot {
    let current = inputs.progress.current;
    SceneSnapshot {
        time: inputs.time,
        phase: inputs.phase,
        gait_phase: inputs.gait_phase,
        progress: ProgressView {
            current,
            target: inputs.progress.target,
            hand_progress: inputs.hand_progress,
            distance_m: inputs.progress.distance_m(),
            distance_label: inputs.progress.distance_label(),
        },
        playback: inputs.playback,
        entities: inputs.pool.entities(),
        rig_position: layout::rig_position(current),
        gravity: layout::gravity(),
        colliders: layout::colliders(current),
        camera: layout::camera(current),
        lights: layout::lights(current),
        effect: inputs.effect.view(),
        events,
    }
}
