//! State shared between the session and the game loop thread.

use std::sync::{Arc, Mutex, MutexGuard};

use handwalk_core::commands::SceneCommand;
use handwalk_core::state::SceneSnapshot;

/// Commands sent from the session to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A host command to forward to the scene engine.
    Scene(SceneCommand),
    /// Stop the scene and end the game loop thread.
    Shutdown,
}

/// Latest snapshot for synchronous polling.
/// Written by the game loop thread after each tick.
#[derive(Debug, Clone, Default)]
pub struct LatestSnapshot {
    inner: Arc<Mutex<Option<SceneSnapshot>>>,
}

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, snapshot: SceneSnapshot) {
        *self.lock() = Some(snapshot);
    }

    /// Clone of the most recent snapshot, if any tick has run.
    pub fn get(&self) -> Option<SceneSnapshot> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<SceneSnapshot>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
