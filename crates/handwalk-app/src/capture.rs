//! Capture loop: hand inference in, step events out.
//!
//! A cooperative task that awaits one inference per cycle, runs the step
//! detector on the first hand, publishes synchronously to the bus, then
//! yields. Only one inference request is ever outstanding. Shutdown is
//! checked before each request and again when it returns; a result that
//! arrives after shutdown is dropped.

use std::future::Future;

use tokio::sync::watch;
use tracing::{debug, info};

use handwalk_core::types::HandObservation;
use handwalk_gait::detector::StepDetector;
use handwalk_sim::bus::StepEventBus;

/// Asynchronous hand-pose estimator fed by the camera.
pub trait KeypointSource: Send {
    /// Estimate hands in the current frame. Errors count as "no hand".
    fn estimate_hands(&mut self) -> impl Future<Output = anyhow::Result<Vec<HandObservation>>> + Send;
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames: u64,
    pub steps_published: u64,
    pub inference_errors: u64,
}

/// Run until `shutdown` flips to true or its sender is dropped.
pub async fn run_capture_loop<S: KeypointSource>(
    mut source: S,
    bus: StepEventBus,
    detector: StepDetector,
    shutdown: watch::Receiver<bool>,
) -> CaptureStats {
    let mut stats = CaptureStats::default();
    info!(threshold = detector.threshold(), "capture loop started");

    loop {
        if stopping(&shutdown) {
            break;
        }
        let result = source.estimate_hands().await;
        if stopping(&shutdown) {
            break;
        }

        stats.frames += 1;
        match result {
            Ok(hands) => {
                if let Some(event) = detector.detect_hands(&hands) {
                    bus.publish(event);
                    stats.steps_published += 1;
                }
            }
            Err(e) => {
                stats.inference_errors += 1;
                debug!(error = %e, "inference failed; treating frame as empty");
            }
        }

        tokio::task::yield_now().await;
    }

    info!(
        frames = stats.frames,
        steps = stats.steps_published,
        errors = stats.inference_errors,
        "capture loop stopped"
    );
    stats
}

fn stopping(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow() || shutdown.has_changed().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;

    use handwalk_core::constants::{INDEX_FINGER_TIP, MIDDLE_FINGER_TIP};
    use handwalk_core::types::Keypoint;
    use tokio::sync::Notify;

    fn hand(index_y: f64, middle_y: f64) -> HandObservation {
        HandObservation::new(vec![
            Keypoint::new(INDEX_FINGER_TIP, 0.0, index_y),
            Keypoint::new(MIDDLE_FINGER_TIP, 0.0, middle_y),
        ])
    }

    /// Plays back a fixed list of frames, then signals shutdown.
    struct ScriptedSource {
        frames: VecDeque<anyhow::Result<Vec<HandObservation>>>,
        done: watch::Sender<bool>,
    }

    impl KeypointSource for ScriptedSource {
        async fn estimate_hands(&mut self) -> anyhow::Result<Vec<HandObservation>> {
            match self.frames.pop_front() {
                Some(frame) => frame,
                None => {
                    let _ = self.done.send(true);
                    Ok(Vec::new())
                }
            }
        }
    }

    /// Blocks inside inference until released.
    struct StalledSource {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    impl KeypointSource for StalledSource {
        async fn estimate_hands(&mut self) -> anyhow::Result<Vec<HandObservation>> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(vec![hand(200.0, 100.0)])
        }
    }

    #[tokio::test]
    async fn test_publishes_steps_in_frame_order() {
        let bus = StepEventBus::new();
        let sub = bus.subscribe();
        let (done, shutdown) = watch::channel(false);

        let source = ScriptedSource {
            frames: VecDeque::from(vec![
                Ok(vec![hand(130.0, 100.0)]),
                Ok(vec![hand(100.0, 100.0)]),
                Ok(Vec::new()),
                Err(anyhow::anyhow!("model not ready")),
                Ok(vec![hand(70.0, 100.0), hand(200.0, 100.0)]),
            ]),
            done,
        };

        let stats = run_capture_loop(source, bus.clone(), StepDetector::default(), shutdown).await;

        let deltas: Vec<f64> = sub.drain().map(|e| e.delta).collect();
        assert_eq!(deltas, vec![30.0, -30.0]);
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.steps_published, 2);
        assert_eq!(stats.inference_errors, 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_start_issues_no_inference() {
        let (done, shutdown) = watch::channel(true);
        let source = ScriptedSource {
            frames: VecDeque::from(vec![Ok(vec![hand(130.0, 100.0)])]),
            done,
        };
        let stats =
            run_capture_loop(source, StepEventBus::new(), StepDetector::default(), shutdown).await;
        assert_eq!(stats, CaptureStats::default());
    }

    #[tokio::test]
    async fn test_in_flight_result_ignored_after_shutdown() {
        let bus = StepEventBus::new();
        let sub = bus.subscribe();
        let (stop, shutdown) = watch::channel(false);
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());

        let task = tokio::spawn(run_capture_loop(
            StalledSource {
                entered: entered.clone(),
                release: release.clone(),
            },
            bus.clone(),
            StepDetector::default(),
            shutdown,
        ));

        entered.notified().await;
        stop.send(true).unwrap();
        release.notify_one();

        let stats = task.await.unwrap();
        assert_eq!(stats.frames, 0);
        assert!(sub.try_next().is_none());
    }

    #[tokio::test]
    async fn test_dropped_shutdown_sender_stops_loop() {
        let (stop, shutdown) = watch::channel(false);
        drop(stop);
        let entered = Arc::new(Notify::new());
        let stats = run_capture_loop(
            StalledSource {
                entered,
                release: Arc::new(Notify::new()),
            },
            StepEventBus::new(),
            StepDetector::default(),
            shutdown,
        )
        .await;
        assert_eq!(stats.frames, 0);
    }
}
