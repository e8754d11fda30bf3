//! Scene engine: the gameplay half of the experience.
//!
//! `SceneEngine` owns progress, the gait machine, the animation marker, and
//! the spawn pool. It drains step events from the bus, processes host
//! commands, runs all systems, and produces `SceneSnapshot`s. Completely
//! headless (no renderer or physics dependency), enabling deterministic
//! testing.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use handwalk_core::catalog::Catalog;
use handwalk_core::commands::SceneCommand;
use handwalk_core::config::SceneConfig;
use handwalk_core::enums::{GaitPhase, Playback, SessionPhase};
use handwalk_core::events::SceneEvent;
use handwalk_core::state::{SceneSnapshot, SpawnedEntity};
use handwalk_core::types::{InstanceId, ProgressState, SimTime};
use handwalk_gait::fsm::GaitMachine;

use crate::bus::{StepEventBus, StepSubscription};
use crate::systems;
use crate::systems::animation::AnimationDriver;
use crate::systems::effect::{color_ramp_effect, Effect};
use crate::systems::smoothing::ProgressSmoother;
use crate::systems::snapshot::SnapshotInputs;
use crate::systems::spawn_pool::SpawnPool;

/// Configuration for starting a new scene.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and same steps = same scene.
    pub seed: u64,
    pub scene: SceneConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            scene: SceneConfig::default(),
        }
    }
}

/// The scene engine. Owns all gameplay state.
pub struct SceneEngine {
    config: SceneConfig,
    time: SimTime,
    phase: SessionPhase,
    rng: ChaCha8Rng,
    gait: GaitMachine,
    progress: ProgressState,
    smoother: ProgressSmoother,
    animation: AnimationDriver,
    playback: Playback,
    pool: SpawnPool,
    effect: Effect,
    steps: Option<StepSubscription>,
    command_queue: VecDeque<SceneCommand>,
    events: Vec<SceneEvent>,
}

impl SceneEngine {
    /// Create a new scene with the given config and spawn catalog.
    pub fn new(config: SimConfig, catalog: Catalog) -> Self {
        let scene = config.scene.validated();
        Self {
            time: SimTime::default(),
            phase: SessionPhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            gait: GaitMachine::new(),
            progress: ProgressState::default(),
            smoother: ProgressSmoother::new(&scene.smoothing),
            animation: AnimationDriver::new(&scene.animation),
            playback: Playback::default(),
            pool: SpawnPool::new(catalog, scene.spawn.clone()),
            effect: color_ramp_effect(),
            steps: None,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            config: scene,
        }
    }

    /// Subscribe to a step bus. Replaces any previous subscription.
    pub fn attach(&mut self, bus: &StepEventBus) {
        self.steps = Some(bus.subscribe());
    }

    /// Queue a host command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SceneCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SceneCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the scene by one tick and return the resulting snapshot.
    /// After `Stop` this is a no-op that keeps returning the final state.
    pub fn tick(&mut self) -> SceneSnapshot {
        self.process_commands();

        if self.phase == SessionPhase::Running {
            self.run_systems();
            self.time.advance(self.config.dt());
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            SnapshotInputs {
                time: self.time,
                phase: self.phase,
                gait_phase: self.gait.phase(),
                progress: self.progress,
                hand_progress: self.animation.hand_progress(),
                playback: self.playback,
                pool: &self.pool,
                effect: &self.effect,
            },
            events,
        )
    }

    /// Remove an entity that crossed the trailing boundary. Idempotent.
    pub fn despawn(&mut self, instance_id: InstanceId) -> Option<SpawnedEntity> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        let removed = self.pool.despawn(instance_id)?;
        self.events.push(SceneEvent::EntityDespawned { instance_id });
        Some(removed)
    }

    /// Tear the scene down: unsubscribe from the bus and freeze all state.
    pub fn stop(&mut self) {
        if self.phase == SessionPhase::Stopped {
            return;
        }
        self.phase = SessionPhase::Stopped;
        self.steps = None;
        self.playback = Playback::Paused;
        self.command_queue.clear();
        info!(
            tick = self.time.tick,
            progress = self.progress.current,
            "scene stopped"
        );
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    pub fn gait_phase(&self) -> GaitPhase {
        self.gait.phase()
    }

    pub fn hand_progress(&self) -> f64 {
        self.animation.hand_progress()
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    /// Clip the playback decisions apply to.
    pub fn animation_clip(&self) -> &str {
        self.animation.clip()
    }

    pub fn pool(&self) -> &SpawnPool {
        &self.pool
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Spawn a specific catalog item right away (for tests).
    #[cfg(test)]
    pub fn spawn_test_item(&mut self, catalog_index: usize) -> Option<SpawnedEntity> {
        self.pool.spawn(catalog_index, self.progress.current)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single host command.
    fn handle_command(&mut self, command: SceneCommand) {
        if self.phase == SessionPhase::Stopped {
            return;
        }
        match command {
            SceneCommand::Despawn { instance_id } => {
                self.despawn(instance_id);
            }
            SceneCommand::DespawnNamed { name } => match InstanceId::parse_name(&name) {
                Some(instance_id) => {
                    self.despawn(instance_id);
                }
                None => debug!(%name, "ignoring boundary crossing for unknown body"),
            },
            SceneCommand::ClearPool => {
                let count = self.pool.clear();
                self.events.push(SceneEvent::PoolCleared { count });
            }
            SceneCommand::Stop => self.stop(),
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Gait (drain every pending step event, in order)
        systems::gait::run(
            self.steps.as_ref(),
            &mut self.gait,
            &mut self.progress,
            &mut self.events,
        );
        // 2. Progress smoothing
        self.progress = self.smoother.advance(self.progress);
        // 3. Hand animation
        self.playback = self.animation.update(self.progress.current);
        // 4. Spawning
        if let Some(spawned) = self.pool.tick(self.progress.current, &mut self.rng) {
            self.events.push(SceneEvent::EntitySpawned {
                instance_id: spawned.instance_id,
                item_id: spawned.item.id,
                x: spawned.spawn_position[0],
            });
        }
        // 5. Post-processing hook
        self.effect.update(self.progress.current);
    }
}
