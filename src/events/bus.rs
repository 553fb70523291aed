//! In-process event bus.
//!
//! Adapted from `coordination::events::bus::EventBus`: a tokio broadcast
//! channel fans events out to subscribers (digest computation, tests), while
//! every published event is also appended to the NDJSON run log. Persistence
//! failures are logged and do not prevent the broadcast — transient I/O
//! on the log is never fatal to the session.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::log::{EventLogError, RunEventLog};
use super::types::CoreEvent;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("log append failed: {0}")]
    LogFailed(#[from] EventLogError),
}

pub type EventBusResult<T> = Result<T, EventBusError>;
pub type SharedEventBus = Arc<EventBus>;

/// Broadcasts [`CoreEvent`]s to subscribers and appends them to the run log.
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
    log: RunEventLog,
    step: std::sync::atomic::AtomicU64,
}

impl EventBus {
    pub fn new(log: RunEventLog) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            log,
            step: std::sync::atomic::AtomicU64::new(0),
        }
    }

    pub fn shared(self) -> SharedEventBus {
        Arc::new(self)
    }

    /// Publish an event: append to the NDJSON log (persistence is the
    /// source of truth) and broadcast to any live subscribers.
    pub fn publish(&self, event: CoreEvent) -> EventBusResult<u64> {
        let step = self
            .step
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let event_type = event.event_type();

        self.log.append(step, &event)?;

        match self.sender.send(event) {
            Ok(count) => debug!(event_type, receivers = count, "event published"),
            Err(_) => debug!(event_type, "event published (no subscribers)"),
        }

        Ok(step)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn current_step(&self) -> u64 {
        self.step.load(std::sync::atomic::Ordering::SeqCst)
    }
}
