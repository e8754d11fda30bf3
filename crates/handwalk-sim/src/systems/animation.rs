//! Hand animation driver.
//!
//! Keeps a lagging marker (`hand_progress`) that chases smoothed progress.
//! While the backlog is large the walk clip plays, faster the bigger the
//! backlog; otherwise the clip is held paused. The player itself belongs
//! to the host.

use handwalk_core::config::AnimationConfig;
use handwalk_core::enums::Playback;

/// Host-side skeletal animation player.
pub trait AnimationPlayer {
    fn play(&mut self, clip: &str);
    fn set_paused(&mut self, clip: &str, paused: bool);
    fn set_time_scale(&mut self, clip: &str, scale: f64);
}

/// Push a playback decision into a player.
pub fn apply<P: AnimationPlayer + ?Sized>(player: &mut P, clip: &str, playback: Playback) {
    match playback {
        Playback::Playing { rate } => {
            player.play(clip);
            player.set_paused(clip, false);
            player.set_time_scale(clip, rate);
        }
        Playback::Paused => player.set_paused(clip, true),
    }
}

/// Maps the progress backlog into playback commands.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    hand_progress: f64,
    catch_up_gap: f64,
    marker_step: f64,
    rate_factor: f64,
    clip: String,
}

impl AnimationDriver {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            hand_progress: 0.0,
            catch_up_gap: config.catch_up_gap,
            marker_step: config.marker_step,
            rate_factor: config.rate_factor,
            clip: config.clip.clone(),
        }
    }

    pub fn hand_progress(&self) -> f64 {
        self.hand_progress
    }

    pub fn clip(&self) -> &str {
        &self.clip
    }

    /// Decide playback for this tick and advance the marker.
    pub fn update(&mut self, current: f64) -> Playback {
        let gap = (self.hand_progress - current).abs();
        if self.hand_progress < current && gap > self.catch_up_gap {
            let speed = (gap / 2.0).max(1.0);
            self.hand_progress += self.marker_step * speed;
            Playback::Playing {
                rate: speed * self.rate_factor,
            }
        } else {
            Playback::Paused
        }
    }

    /// `update` followed by `apply` on the host's player.
    pub fn drive<P: AnimationPlayer + ?Sized>(&mut self, current: f64, player: &mut P) -> Playback {
        let playback = self.update(current);
        apply(player, &self.clip, playback);
        playback
    }
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(&AnimationConfig::default())
    }
}
