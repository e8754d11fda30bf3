//! Tests for the scene engine, step bus, and scene systems.

use handwalk_core::catalog::{Catalog, CatalogItem};
use handwalk_core::commands::SceneCommand;
use handwalk_core::config::{SceneConfig, SmoothingConfig, SpawnConfig};
use handwalk_core::constants::*;
use handwalk_core::enums::*;
use handwalk_core::events::SceneEvent;
use handwalk_core::state::UniformValue;
use handwalk_core::types::{InstanceId, ProgressState, StepEvent};

use crate::bus::StepEventBus;
use crate::engine::{SceneEngine, SimConfig};
use crate::systems::animation::{apply, AnimationDriver, AnimationPlayer};
use crate::systems::effect::color_ramp_effect;
use crate::systems::layout;
use crate::systems::smoothing::{self, ProgressSmoother};
use crate::systems::spawn_pool::SpawnPool;

fn engine_with_spawn_threshold(seed: u64, threshold: f64) -> SceneEngine {
    SceneEngine::new(
        SimConfig {
            seed,
            scene: SceneConfig {
                spawn: SpawnConfig {
                    probability_threshold: threshold,
                    ..Default::default()
                },
                ..Default::default()
            },
        },
        Catalog::builtin(),
    )
}

/// An engine that never spawns on its own.
fn quiet_engine() -> SceneEngine {
    engine_with_spawn_threshold(42, 1.0)
}

fn walk(bus: &StepEventBus, steps: usize) {
    for i in 0..steps {
        let delta = if i % 2 == 0 { 30.0 } else { -30.0 };
        bus.publish(StepEvent::new(delta));
    }
}

#[derive(Default)]
struct RecordingPlayer {
    calls: Vec<String>,
}

impl AnimationPlayer for RecordingPlayer {
    fn play(&mut self, clip: &str) {
        self.calls.push(format!("play {clip}"));
    }

    fn set_paused(&mut self, clip: &str, paused: bool) {
        self.calls.push(format!("paused {clip} {paused}"));
    }

    fn set_time_scale(&mut self, clip: &str, scale: f64) {
        self.calls.push(format!("scale {clip} {scale}"));
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let bus = StepEventBus::new();
    let mut engine_a = engine_with_spawn_threshold(12345, 0.9);
    let mut engine_b = engine_with_spawn_threshold(12345, 0.9);
    engine_a.attach(&bus);
    engine_b.attach(&bus);

    for tick in 0..600 {
        if tick % 15 == 0 {
            walk(&bus, 1 + tick % 2);
        }
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine_with_spawn_threshold(111, 0.5);
    let mut engine_b = engine_with_spawn_threshold(222, 0.5);

    let mut diverged = false;
    for _ in 0..200 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should spawn differently");
}

// ---- Step bus ----

#[test]
fn test_bus_delivers_in_order_to_every_subscriber() {
    let bus = StepEventBus::new();
    let first = bus.subscribe();
    let second = bus.subscribe();

    for delta in [25.0, -40.0, 31.5] {
        assert_eq!(bus.publish(StepEvent::new(delta)), 2);
    }

    let a: Vec<f64> = first.drain().map(|e| e.delta).collect();
    let b: Vec<f64> = second.drain().map(|e| e.delta).collect();
    assert_eq!(a, vec![25.0, -40.0, 31.5]);
    assert_eq!(a, b);
    assert!(first.try_next().is_none());
    assert_eq!(bus.published_count(), 3);
}

#[test]
fn test_bus_subscriber_sees_only_later_events() {
    let bus = StepEventBus::new();
    bus.publish(StepEvent::new(50.0));
    let late = bus.subscribe();
    bus.publish(StepEvent::new(-50.0));
    assert_eq!(late.drain().count(), 1);
}

#[test]
fn test_bus_prunes_dropped_subscribers() {
    let bus = StepEventBus::new();
    let kept = bus.subscribe();
    drop(bus.subscribe());
    assert_eq!(bus.subscriber_count(), 2);

    assert_eq!(bus.publish(StepEvent::new(30.0)), 1);
    assert_eq!(bus.subscriber_count(), 1);
    assert_eq!(kept.try_next(), Some(StepEvent::new(30.0)));
}

#[test]
fn test_bus_clones_share_subscribers() {
    let bus = StepEventBus::new();
    let publisher = bus.clone();
    let sub = bus.subscribe();
    publisher.publish(StepEvent::new(-22.0));
    assert_eq!(sub.try_next().map(|e| e.delta), Some(-22.0));
    assert_eq!(bus.channel_name(), STEP_CHANNEL);
}

#[test]
fn test_bus_publish_without_subscribers() {
    let bus = StepEventBus::new();
    assert_eq!(bus.publish(StepEvent::new(30.0)), 0);
    assert_eq!(bus.published_count(), 1);
}

// ---- Gait integration ----

#[test]
fn test_steps_between_ticks_all_observed() {
    let bus = StepEventBus::new();
    let mut engine = quiet_engine();
    engine.attach(&bus);

    walk(&bus, 3);
    let snap = engine.tick();

    assert_eq!(snap.progress.target, 3.0);
    assert_eq!(snap.gait_phase, GaitPhase::Flop);
    let registered: Vec<f64> = snap
        .events
        .iter()
        .filter_map(|e| match e {
            SceneEvent::StepRegistered { target, .. } => Some(*target),
            _ => None,
        })
        .collect();
    assert_eq!(registered, vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_repeated_direction_registers_once() {
    let bus = StepEventBus::new();
    let mut engine = quiet_engine();
    engine.attach(&bus);

    for _ in 0..5 {
        bus.publish(StepEvent::new(30.0));
    }
    engine.tick();
    assert_eq!(engine.progress().target, 1.0);
    assert_eq!(engine.gait_phase(), GaitPhase::Flop);
}

#[test]
fn test_unattached_engine_ignores_bus() {
    let bus = StepEventBus::new();
    let mut engine = quiet_engine();
    walk(&bus, 4);
    engine.tick();
    assert_eq!(engine.progress().target, 0.0);
}

#[test]
fn test_events_drained_once() {
    let bus = StepEventBus::new();
    let mut engine = quiet_engine();
    engine.attach(&bus);
    walk(&bus, 1);

    assert_eq!(engine.tick().events.len(), 1);
    assert!(engine.tick().events.is_empty());
}

// ---- Smoothing ----

#[test]
fn test_smoother_increment_is_quantized() {
    let smoother = ProgressSmoother::default();
    assert_eq!(smoother.increment(10.0), 0.5);
    assert_eq!(smoother.increment(1.0), 0.05);
    assert_eq!(smoother.increment(0.5), 0.02);
    assert_eq!(smoother.increment(0.19), 0.0);
}

#[test]
fn test_smoother_first_tick_from_rest() {
    let next = smoothing::advance(ProgressState::new(0.0, 10.0));
    assert!((next.current - 0.5).abs() < 1e-12);
    assert_eq!(next.target, 10.0);

    let one_step = smoothing::advance(ProgressState::new(0.0, 1.0));
    assert_eq!(one_step.current, 0.05);
}

#[test]
fn test_smoother_converges_without_overshoot() {
    let mut state = ProgressState::new(0.0, 10.0);
    let mut last = state.current;
    for _ in 0..1000 {
        state = smoothing::advance(state);
        assert!(state.current <= state.target, "overshot: {}", state.current);
        assert!(state.current >= last, "moved backward");
        last = state.current;
    }
    assert!((state.target - state.current).abs() < 0.01);
}

#[test]
fn test_smoother_settles_small_gaps() {
    let mut state = ProgressState::new(4.9, 5.0);
    for _ in 0..20 {
        state = smoothing::advance(state);
    }
    assert!((state.target - state.current).abs() < 1e-9);
}

#[test]
fn test_smoother_without_settle_step_parks_short() {
    let smoother = ProgressSmoother::new(&SmoothingConfig {
        settle_step: 0.0,
        ..Default::default()
    });
    let state = ProgressState::new(4.9, 5.0);
    assert_eq!(smoother.advance(state), state);
}

#[test]
fn test_smoother_idle_at_target_and_nan() {
    let at_rest = ProgressState::new(3.0, 3.0);
    assert_eq!(smoothing::advance(at_rest), at_rest);

    let ahead = ProgressState::new(4.0, 3.0);
    assert_eq!(smoothing::advance(ahead), ahead);

    let broken = ProgressState::new(f64::NAN, 3.0);
    assert!(smoothing::advance(broken).current.is_nan());
}

#[test]
fn test_engine_progress_follows_target() {
    let bus = StepEventBus::new();
    let mut engine = quiet_engine();
    engine.attach(&bus);
    walk(&bus, 10);

    let mut previous = 0.0;
    for _ in 0..400 {
        let snap = engine.tick();
        assert!(snap.progress.current >= previous);
        assert!(snap.progress.current <= snap.progress.target);
        previous = snap.progress.current;
    }
    assert!((engine.progress().current - 10.0).abs() < 0.01);
}

// ---- Animation ----

#[test]
fn test_animation_paused_when_close() {
    let mut driver = AnimationDriver::default();
    assert_eq!(driver.update(0.3), Playback::Paused);
    assert_eq!(driver.hand_progress(), 0.0);
}

#[test]
fn test_animation_plays_at_base_speed() {
    let mut driver = AnimationDriver::default();
    match driver.update(2.0) {
        Playback::Playing { rate } => assert_eq!(rate, 2.0),
        other => panic!("expected playing, got {other:?}"),
    }
    assert!((driver.hand_progress() - 0.1).abs() < 1e-12);
}

#[test]
fn test_animation_speeds_up_with_backlog() {
    let mut driver = AnimationDriver::default();
    match driver.update(10.0) {
        Playback::Playing { rate } => assert_eq!(rate, 10.0),
        other => panic!("expected playing, got {other:?}"),
    }
    assert!((driver.hand_progress() - 0.5).abs() < 1e-12);
}

#[test]
fn test_animation_marker_catches_up_then_pauses() {
    let mut driver = AnimationDriver::default();
    let mut ticks = 0;
    while driver.update(3.0).is_playing() {
        ticks += 1;
        assert!(ticks < 1000, "marker never caught up");
    }
    let hand = driver.hand_progress();
    assert!(hand <= 3.0 + ANIMATION_MARKER_STEP * 1.5);
    assert!((3.0 - hand).abs() <= ANIMATION_CATCH_UP_GAP);
}

#[test]
fn test_animation_drive_applies_to_player() {
    let mut driver = AnimationDriver::default();
    let mut player = RecordingPlayer::default();

    driver.drive(2.0, &mut player);
    driver.drive(0.1, &mut player);

    assert_eq!(
        player.calls,
        vec![
            format!("play {ANIMATION_CLIP}"),
            format!("paused {ANIMATION_CLIP} false"),
            format!("scale {ANIMATION_CLIP} 2"),
            format!("paused {ANIMATION_CLIP} true"),
        ]
    );
}

#[test]
fn test_apply_paused_only_pauses() {
    let mut player = RecordingPlayer::default();
    apply(&mut player, "clip", Playback::Paused);
    assert_eq!(player.calls, vec!["paused clip true".to_string()]);
}

// ---- Spawning ----

#[test]
fn test_pool_fills_to_capacity() {
    let mut engine = engine_with_spawn_threshold(7, 0.0);
    for _ in 0..100 {
        engine.tick();
    }
    assert_eq!(engine.pool().len(), SPAWN_MAX_CAPACITY);
    assert!(engine.pool().is_full());
}

#[test]
fn test_pool_resumes_after_despawn() {
    let mut engine = engine_with_spawn_threshold(7, 0.0);
    for _ in 0..30 {
        engine.tick();
    }
    let before = engine.pool().entities();
    assert_eq!(before.len(), SPAWN_MAX_CAPACITY);

    let oldest = before[0].instance_id;
    engine.queue_command(SceneCommand::Despawn {
        instance_id: oldest,
    });
    let snap = engine.tick();

    assert_eq!(snap.entities.len(), SPAWN_MAX_CAPACITY);
    assert!(!engine.pool().contains(oldest));
    let newest = snap.entities.last().unwrap();
    assert!(before.iter().all(|e| e.instance_id < newest.instance_id));
    assert!(snap
        .events
        .contains(&SceneEvent::EntityDespawned { instance_id: oldest }));
}

#[test]
fn test_default_spawn_rate_is_rare() {
    let mut engine = engine_with_spawn_threshold(99, SPAWN_PROBABILITY_THRESHOLD);
    let mut spawned = 0;
    for _ in 0..600 {
        spawned += engine
            .tick()
            .events
            .iter()
            .filter(|e| matches!(e, SceneEvent::EntitySpawned { .. }))
            .count();
    }
    // ~12 expected at 2% per tick; the cap is not reached from spawns alone.
    assert!(spawned > 0 && spawned <= SPAWN_MAX_CAPACITY, "spawned {spawned}");
}

#[test]
fn test_spawn_position_ahead_of_progress() {
    let mut pool = SpawnPool::new(Catalog::builtin(), SpawnConfig::default());
    let entity = pool.spawn(0, 3.0).unwrap();
    assert_eq!(entity.spawn_position, [3.0 + SPAWN_AHEAD_OFFSET, SPAWN_HEIGHT, 0.0]);
    assert_eq!(entity.name, "thing_0");
    assert!(entity.alive);
}

#[test]
fn test_spawn_uses_catalog_item() {
    let catalog = Catalog::new(vec![CatalogItem::new("book")]).unwrap();
    let mut pool = SpawnPool::new(catalog, SpawnConfig::default());
    let entity = pool.spawn(0, 0.0).unwrap();
    assert_eq!(entity.item.id, "book");
    assert_eq!(entity.item.geometry_key, "book");
    assert!(pool.spawn(1, 0.0).is_none(), "out-of-range index");
}

#[test]
fn test_spawn_refused_when_full() {
    let mut pool = SpawnPool::new(
        Catalog::builtin(),
        SpawnConfig {
            max_capacity: 2,
            ..Default::default()
        },
    );
    assert!(pool.spawn(0, 0.0).is_some());
    assert!(pool.spawn(1, 0.0).is_some());
    assert!(pool.spawn(2, 0.0).is_none());
    assert_eq!(pool.len(), 2);
}

#[test]
fn test_despawn_is_idempotent() {
    let mut pool = SpawnPool::new(Catalog::builtin(), SpawnConfig::default());
    let id = pool.spawn(0, 0.0).unwrap().instance_id;

    let removed = pool.despawn(id).unwrap();
    assert!(!removed.alive);
    assert!(pool.despawn(id).is_none());
    assert!(pool.despawn(InstanceId(999)).is_none());
    assert!(pool.is_empty());
}

#[test]
fn test_despawn_keeps_world_in_step_with_index() {
    let mut pool = SpawnPool::new(Catalog::builtin(), SpawnConfig::default());
    for i in 0..5 {
        pool.spawn(i, 0.0);
    }
    pool.despawn(InstanceId(1));
    pool.despawn(InstanceId(3));
    pool.despawn(InstanceId(3));

    assert_eq!(pool.world().len() as usize, pool.len());
    assert_eq!(pool.len(), 3);
}

#[test]
fn test_despawn_named() {
    let mut pool = SpawnPool::new(Catalog::builtin(), SpawnConfig::default());
    pool.spawn(0, 0.0);
    pool.spawn(1, 0.0);

    assert!(pool.despawn_named("thing_1").is_some());
    assert!(pool.despawn_named("hand").is_none());
    assert!(pool.despawn_named(DESPAWN_SENSOR_NAME).is_none());
    assert_eq!(pool.len(), 1);
    assert!(pool.contains(InstanceId(0)));
}

#[test]
fn test_entities_in_spawn_order() {
    let mut pool = SpawnPool::new(Catalog::builtin(), SpawnConfig::default());
    for i in 0..6 {
        pool.spawn(i, i as f64);
    }
    pool.despawn(InstanceId(2));
    pool.despawn(InstanceId(4));

    let ids: Vec<u64> = pool.entities().iter().map(|e| e.instance_id.0).collect();
    assert_eq!(ids, vec![0, 1, 3, 5]);
}

#[test]
fn test_clear_does_not_reuse_ids() {
    let mut pool = SpawnPool::new(Catalog::builtin(), SpawnConfig::default());
    pool.spawn(0, 0.0);
    pool.spawn(0, 0.0);
    assert_eq!(pool.clear(), 2);
    assert!(pool.is_empty());
    assert_eq!(pool.spawn(0, 0.0).unwrap().instance_id, InstanceId(2));
}

#[test]
fn test_engine_despawn_commands() {
    let mut engine = quiet_engine();
    let a = engine.spawn_test_item(0).unwrap().instance_id;
    let b = engine.spawn_test_item(1).unwrap().instance_id;

    engine.queue_commands([
        SceneCommand::DespawnNamed { name: a.name() },
        SceneCommand::DespawnNamed {
            name: "ground".to_string(),
        },
        SceneCommand::Despawn { instance_id: a },
    ]);
    let snap = engine.tick();

    assert_eq!(snap.entities.len(), 1);
    assert_eq!(snap.entities[0].instance_id, b);
    let despawns = snap
        .events
        .iter()
        .filter(|e| matches!(e, SceneEvent::EntityDespawned { .. }))
        .count();
    assert_eq!(despawns, 1);
}

#[test]
fn test_engine_clear_pool_command() {
    let mut engine = quiet_engine();
    engine.spawn_test_item(0);
    engine.spawn_test_item(0);
    engine.queue_command(SceneCommand::ClearPool);

    let snap = engine.tick();
    assert!(snap.entities.is_empty());
    assert!(snap.events.contains(&SceneEvent::PoolCleared { count: 2 }));
}

#[test]
fn test_spawn_event_carries_position() {
    let mut engine = engine_with_spawn_threshold(5, 0.0);
    let snap = engine.tick();
    let spawned = snap
        .events
        .iter()
        .find_map(|e| match e {
            SceneEvent::EntitySpawned { x, instance_id, .. } => Some((*x, *instance_id)),
            _ => None,
        })
        .unwrap();
    assert_eq!(spawned, (SPAWN_AHEAD_OFFSET, InstanceId(0)));
}

// ---- Lifecycle ----

#[test]
fn test_tick_advances_time() {
    let mut engine = quiet_engine();
    for _ in 0..TICK_RATE {
        engine.tick();
    }
    let time = engine.time();
    assert_eq!(time.tick, TICK_RATE as u64);
    assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
}

#[test]
fn test_stop_freezes_scene() {
    let bus = StepEventBus::new();
    let mut engine = engine_with_spawn_threshold(3, 0.0);
    engine.attach(&bus);
    walk(&bus, 2);
    engine.tick();

    engine.queue_command(SceneCommand::Stop);
    let stopped = engine.tick();
    assert_eq!(stopped.phase, SessionPhase::Stopped);
    assert_eq!(stopped.playback, Playback::Paused);

    // The engine's subscription is gone.
    assert_eq!(bus.publish(StepEvent::new(30.0)), 0);

    engine.queue_command(SceneCommand::ClearPool);
    for _ in 0..10 {
        let snap = engine.tick();
        assert_eq!(snap.time.tick, stopped.time.tick);
        assert_eq!(snap.progress.target, stopped.progress.target);
        assert_eq!(snap.entities.len(), stopped.entities.len());
        assert!(snap.events.is_empty());
    }
}

#[test]
fn test_stop_is_idempotent() {
    let mut engine = quiet_engine();
    engine.stop();
    engine.stop();
    assert_eq!(engine.phase(), SessionPhase::Stopped);
    assert!(engine.despawn(InstanceId(0)).is_none());
}

#[test]
fn test_invalid_config_is_normalized() {
    let engine = SceneEngine::new(
        SimConfig {
            seed: 1,
            scene: SceneConfig {
                tick_rate: 0,
                ..Default::default()
            },
        },
        Catalog::builtin(),
    );
    assert_eq!(engine.config().tick_rate, 1);
    assert_eq!(engine.animation_clip(), ANIMATION_CLIP);
}

// ---- Layout and effect ----

#[test]
fn test_layout_follows_progress() {
    let camera = layout::camera(3.0);
    assert_eq!(camera.position, [3.0, 0.0, 8.0]);
    assert_eq!(camera.look_at, [3.0, 2.0, 0.0]);

    let xs: Vec<f32> = layout::lights(3.0).iter().map(|l| l.position[0]).collect();
    assert_eq!(xs, vec![-2.0, 3.0, 8.0]);

    assert_eq!(layout::rig_position(3.0), [3.0, 0.0, 0.0]);
    assert_eq!(layout::gravity(), [0.0, SCENE_GRAVITY, 0.0]);
}

#[test]
fn test_floor_sensor_below_scene() {
    let colliders = layout::colliders(10.0);
    assert_eq!(colliders.len(), 4);
    let floor = colliders
        .iter()
        .find(|c| c.name == DESPAWN_SENSOR_NAME)
        .unwrap();
    assert!(floor.sensor);
    assert_eq!(floor.position, [10.0, DESPAWN_SENSOR_Y, 0.0]);
    assert_eq!(colliders.iter().filter(|c| c.sensor).count(), 1);
}

#[test]
fn test_effect_tracks_progress() {
    let mut effect = color_ramp_effect();
    assert_eq!(effect.uniform("param"), Some(&UniformValue::Float(0.1)));
    effect.update(2.5);
    assert_eq!(effect.uniform("progress"), Some(&UniformValue::Float(2.5)));
    assert!(matches!(effect.uniform("colorRamp"), Some(UniformValue::Texture(_))));
}

#[test]
fn test_snapshot_readout_and_effect() {
    let bus = StepEventBus::new();
    let mut engine = quiet_engine();
    engine.attach(&bus);
    walk(&bus, 2);

    let snap = engine.tick();
    let current = snap.progress.current;
    assert!(current > 0.0);
    assert_eq!(snap.progress.distance_label, format!("{:.3}m", snap.progress.distance_m));
    assert_eq!(
        snap.effect.uniforms.get("progress"),
        Some(&UniformValue::Float(current as f32))
    );
    assert_eq!(snap.camera.position[0], current as f32);
}

#[test]
fn test_snapshot_serializes() {
    let mut engine = engine_with_spawn_threshold(8, 0.0);
    let snap = engine.tick();
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.contains("\"EntitySpawned\""));
    assert!(json.contains("thing_0"));
}
