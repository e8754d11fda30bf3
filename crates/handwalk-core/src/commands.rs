//! Commands sent from the host (physics, lifecycle) to the scene engine.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::InstanceId;

/// All host-driven scene actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SceneCommand {
    /// Boundary sensor crossing, by id.
    Despawn { instance_id: InstanceId },
    /// Boundary sensor crossing, by rigid body name (`thing_<id>`).
    DespawnNamed { name: String },
    /// Remove every spawned entity.
    ClearPool,
    /// Tear the scene down; later ticks are no-ops.
    Stop,
}
