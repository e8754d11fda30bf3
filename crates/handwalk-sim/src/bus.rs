//! Step event bus: the `finger-step` channel between capture and gameplay.
//!
//! Publishers and subscribers share one bus by cloning it. Every subscriber
//! gets its own unbounded queue, so events are delivered to each of them in
//! publication order with nothing dropped or merged. Publishing never waits
//! for a subscriber.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use handwalk_core::constants::STEP_CHANNEL;
use handwalk_core::types::StepEvent;

#[derive(Debug, Default)]
struct BusInner {
    subscribers: Mutex<Vec<Sender<StepEvent>>>,
    published: AtomicU64,
}

/// Cloneable handle to a step event channel.
#[derive(Debug, Clone, Default)]
pub struct StepEventBus {
    inner: Arc<BusInner>,
}

impl StepEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel name used by hosts that route events by name.
    pub fn channel_name(&self) -> &'static str {
        STEP_CHANNEL
    }

    /// Register a new subscriber. It sees every event published from now on.
    pub fn subscribe(&self) -> StepSubscription {
        let (tx, rx) = mpsc::channel();
        self.subscribers().push(tx);
        StepSubscription { rx }
    }

    /// Deliver an event to every live subscriber. Returns how many received it.
    /// Dropped subscriptions are pruned.
    pub fn publish(&self, event: StepEvent) -> usize {
        self.inner.published.fetch_add(1, Ordering::Relaxed);
        let mut subscribers = self.subscribers();
        subscribers.retain(|tx| tx.send(event).is_ok());
        trace!(
            channel = STEP_CHANNEL,
            delta = event.delta,
            receivers = subscribers.len(),
            "step published"
        );
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers().len()
    }

    /// Total events ever published on this bus.
    pub fn published_count(&self) -> u64 {
        self.inner.published.load(Ordering::Relaxed)
    }

    // Poison is recovered: the sender list is never left half-updated.
    fn subscribers(&self) -> MutexGuard<'_, Vec<Sender<StepEvent>>> {
        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Receiving end of one bus subscription. Dropping it unsubscribes.
#[derive(Debug)]
pub struct StepSubscription {
    rx: Receiver<StepEvent>,
}

impl StepSubscription {
    /// Next pending event, if any. Never blocks.
    pub fn try_next(&self) -> Option<StepEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// All pending events, oldest first. Never blocks.
    pub fn drain(&self) -> impl Iterator<Item = StepEvent> + '_ {
        self.rx.try_iter()
    }
}
