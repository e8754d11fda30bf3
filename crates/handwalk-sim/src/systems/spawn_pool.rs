//! Spawn pool: the bounded set of shelf items ahead of the player.
//!
//! Items live as hecs entities. Instance ids come from a monotonic counter,
//! so sorting by id gives spawn order and ids are never reused, even after
//! a clear. The pool never holds more than `max_capacity` entities.

use std::collections::HashMap;

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use tracing::{debug, warn};

use handwalk_core::catalog::Catalog;
use handwalk_core::components::{SpawnPosition, SpawnedItem};
use handwalk_core::config::SpawnConfig;
use handwalk_core::state::SpawnedEntity;
use handwalk_core::types::InstanceId;

/// Bounded, order-preserving pool of spawned items.
pub struct SpawnPool {
    world: World,
    index: HashMap<InstanceId, Entity>,
    catalog: Catalog,
    config: SpawnConfig,
    next_instance_id: u64,
}

impl SpawnPool {
    pub fn new(catalog: Catalog, config: SpawnConfig) -> Self {
        Self {
            world: World::new(),
            index: HashMap::new(),
            catalog,
            config,
            next_instance_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.config.max_capacity
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.config.max_capacity
    }

    pub fn contains(&self, instance_id: InstanceId) -> bool {
        self.index.contains_key(&instance_id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Read-only access to the item world (for hosts mirroring it).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Per-tick spawn roll. The draw is taken every tick, full or not,
    /// so the random stream does not depend on pool occupancy.
    pub fn tick<R: Rng + ?Sized>(&mut self, progress: f64, rng: &mut R) -> Option<SpawnedEntity> {
        let roll: f64 = rng.gen();
        if self.is_full() || roll <= self.config.probability_threshold {
            return None;
        }
        let catalog_index = self.catalog.choose_index(rng);
        self.spawn(catalog_index, progress)
    }

    /// Drop the given catalog item ahead of `progress`. Skipped when full.
    pub fn spawn(&mut self, catalog_index: usize, progress: f64) -> Option<SpawnedEntity> {
        if self.is_full() {
            return None;
        }
        let item = self.catalog.get(catalog_index)?;

        let instance_id = InstanceId(self.next_instance_id);
        self.next_instance_id += 1;

        let position = Vec3::new(
            progress as f32 + self.config.ahead_offset,
            self.config.spawn_height,
            0.0,
        );
        let entity = self.world.spawn((
            SpawnedItem {
                instance_id,
                catalog_index,
            },
            SpawnPosition(position),
        ));
        self.index.insert(instance_id, entity);

        debug!(
            %instance_id,
            item = %item.id,
            x = position.x,
            live = self.index.len(),
            "item spawned"
        );
        debug_assert!(self.len() <= self.config.max_capacity);

        self.view(entity, true)
    }

    /// Remove an item that crossed the trailing boundary.
    /// Unknown or already-removed ids are ignored.
    pub fn despawn(&mut self, instance_id: InstanceId) -> Option<SpawnedEntity> {
        let entity = self.index.remove(&instance_id)?;
        let removed = self.view(entity, false);
        if let Err(e) = self.world.despawn(entity) {
            warn!(%instance_id, error = %e, "indexed item missing from world");
        }
        debug!(%instance_id, live = self.index.len(), "item despawned");
        removed
    }

    /// Despawn by rigid body name as reported by the boundary sensor.
    pub fn despawn_named(&mut self, name: &str) -> Option<SpawnedEntity> {
        self.despawn(InstanceId::parse_name(name)?)
    }

    /// Remove every item. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.index.len();
        self.index.clear();
        self.world.clear();
        count
    }

    pub fn get(&self, instance_id: InstanceId) -> Option<SpawnedEntity> {
        let entity = *self.index.get(&instance_id)?;
        self.view(entity, true)
    }

    /// Live items in spawn order.
    pub fn entities(&self) -> Vec<SpawnedEntity> {
        let mut live: Vec<(InstanceId, Entity)> =
            self.index.iter().map(|(&id, &entity)| (id, entity)).collect();
        live.sort_unstable_by_key(|&(id, _)| id);
        live.into_iter()
            .filter_map(|(_, entity)| self.view(entity, true))
            .collect()
    }

    fn view(&self, entity: Entity, alive: bool) -> Option<SpawnedEntity> {
        let mut query = self
            .world
            .query_one::<(&SpawnedItem, &SpawnPosition)>(entity)
            .ok()?;
        let (spawned, position) = query.get()?;
        let item = self.catalog.get(spawned.catalog_index)?;
        Some(SpawnedEntity {
            instance_id: spawned.instance_id,
            name: spawned.instance_id.name(),
            item: item.clone(),
            spawn_position: position.0.to_array(),
            alive,
        })
    }
}
