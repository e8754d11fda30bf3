//! Scene constants and tuning parameters.

/// Render/physics tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Step detection ---

/// Dead-zone for fingertip separation (pixel units).
/// Separations smaller than this are treated as a neutral hand pose.
pub const STEP_THRESHOLD: f64 = 20.0;

/// Name of the step event channel.
pub const STEP_CHANNEL: &str = "finger-step";

/// Keypoint name of the index fingertip reported by the hand model.
pub const INDEX_FINGER_TIP: &str = "index_finger_tip";

/// Keypoint name of the middle fingertip reported by the hand model.
pub const MIDDLE_FINGER_TIP: &str = "middle_finger_tip";

// --- Progress smoothing ---

/// Divisor applied to the target gap each tick (~20 tick time constant).
pub const SMOOTHING_DIVISOR: f64 = 20.0;

/// Fixed-point scale for the smoothing increment (two decimal places).
pub const SMOOTHING_QUANTUM: f64 = 100.0;

/// Step used once the quantized increment rounds to zero.
/// Zero keeps `current` parked up to 0.2 short of `target`.
pub const SMOOTHING_SETTLE_STEP: f64 = 0.01;

// --- Animation ---

/// Backlog above which the hand animation plays to catch up.
pub const ANIMATION_CATCH_UP_GAP: f64 = 0.5;

/// Marker advance per tick at base speed.
pub const ANIMATION_MARKER_STEP: f64 = 0.1;

/// Playback rate multiplier applied on top of the catch-up speed.
pub const ANIMATION_RATE_FACTOR: f64 = 2.0;

/// Clip name of the walking animation in the hand rig.
pub const ANIMATION_CLIP: &str = "rig.001";

// --- Spawning ---

/// A uniform draw above this spawns an item (~2% chance per tick).
pub const SPAWN_PROBABILITY_THRESHOLD: f64 = 0.98;

/// Maximum number of live spawned entities.
pub const SPAWN_MAX_CAPACITY: usize = 20;

/// Distance ahead of current progress at which items spawn.
pub const SPAWN_AHEAD_OFFSET: f32 = 5.2;

/// Height at which items spawn (they fall onto the shelf).
pub const SPAWN_HEIGHT: f32 = 5.0;

/// Prefix of spawned entity names reported back by the boundary sensor.
pub const SPAWN_NAME_PREFIX: &str = "thing_";

// --- Scene layout ---

/// Gravity along Y used by the host physics world (m/s²).
pub const SCENE_GRAVITY: f32 = -5.0;

/// Camera offset from the progress anchor.
pub const CAMERA_OFFSET: [f32; 3] = [0.0, 0.0, 8.0];

/// Camera look-at offset from the progress anchor.
pub const CAMERA_LOOK_OFFSET: [f32; 3] = [0.0, 2.0, 0.0];

/// X offsets of the three point lights that follow the player.
pub const LIGHT_X_OFFSETS: [f32; 3] = [-5.0, 0.0, 5.0];

/// Height and depth of the following point lights.
pub const LIGHT_HEIGHT: f32 = 3.0;
pub const LIGHT_DEPTH: f32 = 2.0;

/// Power of each point light.
pub const LIGHT_POWER: f32 = 100.0;

/// Depth of the despawn sensor plane below the floor.
pub const DESPAWN_SENSOR_Y: f32 = -4.0;

/// Name of the despawn sensor collider.
pub const DESPAWN_SENSOR_NAME: &str = "floor";

// --- Capture ---

/// Initial delay between camera readiness checks (milliseconds).
pub const CAPTURE_WARMUP_INITIAL_MS: u64 = 100;

/// Upper bound on the readiness backoff delay (milliseconds).
pub const CAPTURE_WARMUP_MAX_MS: u64 = 1_000;

/// Number of readiness checks before setup gives up.
pub const CAPTURE_WARMUP_ATTEMPTS: u32 = 10;

/// How long teardown waits for the capture loop to notice shutdown before
/// leaving an in-flight inference call behind (milliseconds).
pub const CAPTURE_STOP_GRACE_MS: u64 = 250;

// --- Display ---

/// Progress units per displayed meter (readout is floor(p * 100) / 1000).
pub const DISTANCE_DISPLAY_SCALE: f64 = 100.0;
pub const DISTANCE_DISPLAY_DIVISOR: f64 = 1000.0;
