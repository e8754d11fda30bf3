//! Headless handwalk session with a simulated camera.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use handwalk_app::demo::{HandMotion, LoggingHost, SimulatedCamera};
use handwalk_app::session::Session;
use handwalk_core::catalog::Catalog;
use handwalk_core::config::SceneConfig;
use handwalk_sim::engine::SimConfig;

/// How far behind the player items are reported as fallen off.
const TRAILING_DISTANCE: f32 = 8.0;

#[derive(Parser, Debug)]
#[command(name = "handwalk", about = "Walk down a shelf aisle with two fingers")]
struct Cli {
    /// Scene config (JSON). Missing fields use built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Spawn catalog (JSON array of items). Defaults to the built-in aisle.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// RNG seed for spawning and the simulated hand
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Run for N seconds, then tear down
    #[arg(long, default_value_t = 10)]
    duration_secs: u64,

    /// Simulate a user refusing camera access
    #[arg(long)]
    deny_camera: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handwalk=info".into()),
        )
        .init();

    let scene = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display()))?,
        None => Catalog::builtin(),
    };
    info!(
        seed = cli.seed,
        items = catalog.len(),
        tick_rate = scene.tick_rate,
        "handwalk v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let camera = if cli.deny_camera {
        SimulatedCamera::denied(cli.seed)
    } else {
        SimulatedCamera::new(cli.seed, HandMotion::default())
    };
    let config = SimConfig {
        seed: cli.seed,
        scene,
    };
    let session = Session::start(config, catalog, camera, LoggingHost::new(TRAILING_DISTANCE)).await;

    let mut report = tokio::time::interval(Duration::from_secs(1));
    let deadline = tokio::time::sleep(Duration::from_secs(cli.duration_secs));
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = report.tick() => {
                if let Some(snapshot) = session.latest_snapshot() {
                    info!(
                        distance = %snapshot.progress.distance_label,
                        steps = snapshot.progress.target,
                        items = snapshot.entities.len(),
                        "walking"
                    );
                }
            }
        }
    }

    let last = session.teardown().await?;
    if let Some(snapshot) = last {
        info!(
            distance = %snapshot.progress.distance_label,
            ticks = snapshot.time.tick,
            "session finished"
        );
    }
    Ok(())
}
