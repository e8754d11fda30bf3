//! Spawn catalog: the static table of items that can appear on the shelf.
//!
//! Loaded once at startup, either from the built-in grocery table or from a
//! JSON file. Item selection is weighted by `spawn_weight`; equal weights
//! give a uniform pick.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::enums::ColliderShape;

fn default_spawn_weight() -> f64 {
    1.0
}

/// A spawnable item definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    /// Geometry node in the item asset. Defaults to `id`.
    #[serde(default)]
    pub geometry_key: String,
    /// Material in the item asset. Defaults to `geometry_key`.
    #[serde(default)]
    pub material_key: String,
    /// Explicit collider shape; `None` lets the host pick its default.
    #[serde(default)]
    pub collider_shape: Option<ColliderShape>,
    #[serde(default = "default_spawn_weight")]
    pub spawn_weight: f64,
}

impl CatalogItem {
    /// Item whose geometry and material share its id.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            geometry_key: id.to_string(),
            material_key: id.to_string(),
            collider_shape: None,
            spawn_weight: default_spawn_weight(),
        }
    }

    pub fn with_material(mut self, material: &str) -> Self {
        self.material_key = material.to_string();
        self
    }

    pub fn with_collider(mut self, shape: ColliderShape) -> Self {
        self.collider_shape = Some(shape);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.spawn_weight = weight;
        self
    }

    fn fill_defaults(&mut self) {
        if self.geometry_key.is_empty() {
            self.geometry_key = self.id.clone();
        }
        if self.material_key.is_empty() {
            self.material_key = self.geometry_key.clone();
        }
    }
}

/// Reasons a catalog table is rejected at load time.
#[derive(Debug)]
pub enum CatalogError {
    Empty,
    /// Item at this position has a blank id.
    EmptyId(usize),
    DuplicateId(String),
    InvalidWeight { id: String, weight: f64 },
    /// Every weight is zero, so nothing could ever be picked.
    NoPositiveWeight,
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Empty => write!(f, "catalog has no items"),
            CatalogError::EmptyId(index) => write!(f, "catalog item {index} has an empty id"),
            CatalogError::DuplicateId(id) => write!(f, "duplicate catalog id `{id}`"),
            CatalogError::InvalidWeight { id, weight } => {
                write!(f, "catalog item `{id}` has invalid spawn weight {weight}")
            }
            CatalogError::NoPositiveWeight => write!(f, "catalog has no positive spawn weight"),
            CatalogError::Io(e) => write!(f, "failed to read catalog: {e}"),
            CatalogError::Parse(e) => write!(f, "failed to parse catalog: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// Validated, read-only catalog with a prepared weighted sampler.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    sampler: WeightedIndex<f64>,
}

impl Catalog {
    /// Validate a table of items and build the sampler.
    pub fn new(mut items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, item) in items.iter_mut().enumerate() {
            if item.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(index));
            }
            item.fill_defaults();
            if !seen.insert(item.id.clone()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
            if !item.spawn_weight.is_finite() || item.spawn_weight < 0.0 {
                return Err(CatalogError::InvalidWeight {
                    id: item.id.clone(),
                    weight: item.spawn_weight,
                });
            }
        }

        let sampler = WeightedIndex::new(items.iter().map(|i| i.spawn_weight))
            .map_err(|_| CatalogError::NoPositiveWeight)?;

        Ok(Self { items, sampler })
    }

    /// Parse a JSON array of items.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<CatalogItem> = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        Self::new(items)
    }

    /// Read and parse a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(CatalogError::Io)?;
        Self::from_json(&contents)
    }

    /// The grocery shelf table the scene ships with.
    pub fn builtin() -> Self {
        let items = vec![
            CatalogItem::new("brinjal"),
            CatalogItem::new("beer"),
            CatalogItem::new("milo"),
            CatalogItem::new("maling"),
            CatalogItem::new("pokka1").with_material("pokka_bottle"),
            CatalogItem::new("pokka2").with_material("pokka_bottle"),
            CatalogItem::new("pokka3").with_material("pokka_bottle"),
            CatalogItem::new("pokka4").with_material("pokka_bottle"),
            CatalogItem::new("pokka5").with_material("pokka_bottle"),
            CatalogItem::new("shin"),
            CatalogItem::new("apple").with_collider(ColliderShape::Ball),
            CatalogItem::new("calbee"),
            CatalogItem::new("cup_noodles"),
            CatalogItem::new("kranch_1").with_material("kranch"),
            CatalogItem::new("wiper_sheet").with_material("wipe"),
            CatalogItem::new("oatside-1").with_material("oatside"),
            CatalogItem::new("genmaicha"),
            CatalogItem::new("yoghurt"),
        ];
        // The builtin table has unique ids and unit weights.
        match Self::new(items) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("builtin catalog is invalid: {e}"),
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// Pick an item index according to spawn weights.
    pub fn choose_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sampler.sample(rng)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
