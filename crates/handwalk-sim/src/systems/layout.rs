//! Scene layout: colliders, camera, and lights that travel with the player.
//!
//! Everything is anchored at `(progress, 0, 0)` and rebuilt every tick so the
//! physics host can move its colliders with the scroll.

use glam::Vec3;

use handwalk_core::constants::*;
use handwalk_core::state::{CameraRig, ColliderPlacement, PointLight};

struct ColliderTemplate {
    name: &'static str,
    offset: Vec3,
    rotation: Vec3,
    half_extents: Vec3,
    sensor: bool,
}

const COLLIDERS: [ColliderTemplate; 4] = [
    // Hand rig body, turned slightly toward the shelf.
    ColliderTemplate {
        name: "hand",
        offset: Vec3::new(-0.2, 0.75, 0.0),
        rotation: Vec3::new(0.0, 0.3, 0.0),
        half_extents: Vec3::new(0.5, 1.0, 0.5),
        sensor: false,
    },
    ColliderTemplate {
        name: "shelf",
        offset: Vec3::new(0.0, 1.25, -2.8),
        rotation: Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
        half_extents: Vec3::new(5.0, 0.1, 2.5),
        sensor: false,
    },
    ColliderTemplate {
        name: "ground",
        offset: Vec3::new(0.0, -0.1, 0.0),
        rotation: Vec3::ZERO,
        half_extents: Vec3::new(7.5, 0.1, 2.5),
        sensor: false,
    },
    // Items falling past this plane are reported back for despawn.
    ColliderTemplate {
        name: DESPAWN_SENSOR_NAME,
        offset: Vec3::new(0.0, DESPAWN_SENSOR_Y, 0.0),
        rotation: Vec3::ZERO,
        half_extents: Vec3::new(30.0, 0.5, 20.0),
        sensor: true,
    },
];

fn anchor(progress: f64) -> Vec3 {
    Vec3::new(progress as f32, 0.0, 0.0)
}

/// Where the hand rig root sits.
pub fn rig_position(progress: f64) -> [f32; 3] {
    anchor(progress).to_array()
}

pub fn gravity() -> [f32; 3] {
    Vec3::new(0.0, SCENE_GRAVITY, 0.0).to_array()
}

/// Collider poses for the current progress.
pub fn colliders(progress: f64) -> Vec<ColliderPlacement> {
    let anchor = anchor(progress);
    COLLIDERS
        .iter()
        .map(|template| ColliderPlacement {
            name: template.name.to_string(),
            position: (anchor + template.offset).to_array(),
            rotation: template.rotation.to_array(),
            half_extents: template.half_extents.to_array(),
            sensor: template.sensor,
        })
        .collect()
}

pub fn camera(progress: f64) -> CameraRig {
    let anchor = anchor(progress);
    CameraRig {
        position: (anchor + Vec3::from_array(CAMERA_OFFSET)).to_array(),
        look_at: (anchor + Vec3::from_array(CAMERA_LOOK_OFFSET)).to_array(),
    }
}

pub fn lights(progress: f64) -> Vec<PointLight> {
    let anchor = anchor(progress);
    LIGHT_X_OFFSETS
        .iter()
        .map(|&dx| PointLight {
            position: (anchor + Vec3::new(dx, LIGHT_HEIGHT, LIGHT_DEPTH)).to_array(),
            power: LIGHT_POWER,
        })
        .collect()
}
