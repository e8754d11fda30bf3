//! Scene snapshot: the complete host-visible state produced each tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::enums::*;
use crate::events::SceneEvent;
use crate::types::{InstanceId, SimTime};

/// Complete scene state handed to the renderer/physics host after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub time: SimTime,
    pub phase: SessionPhase,
    pub gait_phase: GaitPhase,
    pub progress: ProgressView,
    pub playback: Playback,
    /// Live entities in spawn order.
    pub entities: Vec<SpawnedEntity>,
    /// Root of the hand rig.
    pub rig_position: [f32; 3],
    /// Gravity for the host physics world.
    pub gravity: [f32; 3],
    pub colliders: Vec<ColliderPlacement>,
    pub camera: CameraRig,
    pub lights: Vec<PointLight>,
    pub effect: EffectView,
    pub events: Vec<SceneEvent>,
}

/// Progress values for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressView {
    pub current: f64,
    pub target: f64,
    /// Position of the hand animation marker.
    pub hand_progress: f64,
    pub distance_m: f64,
    pub distance_label: String,
}

/// A spawned item as seen by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnedEntity {
    pub instance_id: InstanceId,
    /// Rigid body name the boundary sensor will report.
    pub name: String,
    pub item: CatalogItem,
    pub spawn_position: [f32; 3],
    pub alive: bool,
}

/// A physics collider the host should keep at the given pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColliderPlacement {
    pub name: String,
    pub position: [f32; 3],
    /// Euler rotation (radians, XYZ order).
    pub rotation: [f32; 3],
    pub half_extents: [f32; 3],
    /// Sensors report intersections instead of colliding.
    pub sensor: bool,
}

/// Camera pose following the player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

/// A point light following the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: [f32; 3],
    pub power: f32,
}

/// Post-processing effect parameters for this frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectView {
    pub name: String,
    pub uniforms: BTreeMap<String, UniformValue>,
}

/// A shader uniform value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniformValue {
    Float(f32),
    Texture(String),
}
