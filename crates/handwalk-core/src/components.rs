//! ECS components for spawned hecs entities.
//!
//! Components are plain data structs with no methods.
//! Spawn and despawn logic lives in the sim crate's spawn pool.

use serde::{Deserialize, Serialize};

use crate::types::InstanceId;

/// Marks an entity as a shelf item and links it to its catalog row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnedItem {
    pub instance_id: InstanceId,
    /// Index into the catalog the pool was built with.
    pub catalog_index: usize,
}

/// Where the item was dropped into the scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnPosition(pub glam::Vec3);

