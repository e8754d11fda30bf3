//! Game loop thread: ticks the scene engine at a fixed rate.
//!
//! The engine is moved into this thread and owned by it alone. Commands
//! arrive via `mpsc` channel. After each tick the host applies the playback
//! decision to its animation player, inspects the snapshot, and may queue
//! follow-up commands (boundary crossings) for the next tick.

use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use handwalk_core::commands::SceneCommand;
use handwalk_core::state::SceneSnapshot;
use handwalk_sim::engine::SceneEngine;
use handwalk_sim::systems::animation::{self, AnimationPlayer};

use crate::state::{GameLoopCommand, LatestSnapshot};

/// Renderer/physics side of the scene, driven once per tick.
pub trait SceneHost: AnimationPlayer + Send {
    /// Inspect the new snapshot. Returned commands run at the next tick.
    fn observe(&mut self, snapshot: &SceneSnapshot) -> Vec<SceneCommand>;
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle for teardown.
pub fn spawn_game_loop<H>(
    engine: SceneEngine,
    host: H,
    latest_snapshot: LatestSnapshot,
) -> (mpsc::Sender<GameLoopCommand>, JoinHandle<()>)
where
    H: SceneHost + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("handwalk-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, host, cmd_rx, &latest_snapshot);
        })
        .expect("Failed to spawn game loop thread");

    (cmd_tx, handle)
}

/// The game loop. Runs until Shutdown command or channel disconnect.
fn run_game_loop<H: SceneHost>(
    mut engine: SceneEngine,
    mut host: H,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &LatestSnapshot,
) {
    let tick_duration = Duration::from_secs_f64(engine.config().dt());
    let mut next_tick_time = Instant::now();
    info!(tick_rate = engine.config().tick_rate, "game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Scene(cmd)) => engine.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    finish(&mut engine, &mut host, latest_snapshot);
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick
        let snapshot = step(&mut engine, &mut host);

        // 3. Store latest snapshot for synchronous polling
        latest_snapshot.store(snapshot);

        // 4. Sleep until next tick
        next_tick_time += tick_duration;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick_duration * 2 {
            // Too far behind; reset to avoid catch-up spiral
            next_tick_time = now;
        }
    }
}

/// One tick plus the host's frame work.
fn step<H: SceneHost>(engine: &mut SceneEngine, host: &mut H) -> SceneSnapshot {
    let snapshot = engine.tick();
    animation::apply(host, engine.animation_clip(), snapshot.playback);
    let follow_up = host.observe(&snapshot);
    if !follow_up.is_empty() {
        debug!(count = follow_up.len(), "host queued commands");
        engine.queue_commands(follow_up);
    }
    snapshot
}

fn finish<H: SceneHost>(engine: &mut SceneEngine, host: &mut H, latest_snapshot: &LatestSnapshot) {
    engine.stop();
    let snapshot = engine.tick();
    animation::apply(host, engine.animation_clip(), snapshot.playback);
    info!(
        ticks = snapshot.time.tick,
        distance = %snapshot.progress.distance_label,
        "game loop stopped"
    );
    latest_snapshot.store(snapshot);
}
