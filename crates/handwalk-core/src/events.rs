//! Events emitted by the scene for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::GaitPhase;
use crate::types::InstanceId;

/// Things that happened during a tick, drained into the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SceneEvent {
    /// A gait transition advanced the target.
    StepRegistered { target: f64, phase: GaitPhase },
    /// An item was dropped onto the shelf.
    EntitySpawned {
        instance_id: InstanceId,
        item_id: String,
        x: f32,
    },
    /// An item crossed the trailing boundary.
    EntityDespawned { instance_id: InstanceId },
    /// Every item was removed at once.
    PoolCleared { count: usize },
}
