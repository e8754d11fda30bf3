//! Scene engine for handwalk.
//!
//! Owns the spawn pool's hecs world, consumes step events from the bus,
//! runs systems at a fixed tick rate, and produces `SceneSnapshot`s for
//! the renderer/physics host.

pub mod bus;
pub mod engine;
pub mod systems;

pub use bus::{StepEventBus, StepSubscription};
pub use engine::{SceneEngine, SimConfig};
pub use handwalk_core as core;

#[cfg(test)]
mod tests;
