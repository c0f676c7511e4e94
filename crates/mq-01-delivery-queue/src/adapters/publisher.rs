//! Event publisher adapter for the Delivery Queue subsystem.
//!
//! Queue state changes are reported to an outbound publisher after the
//! queue's critical section has been left. A failing publisher never fails
//! the queue operation that produced the event.

use crate::domain::{MessageId, Priority, Sequence, TransactionToken};
use parking_lot::Mutex;
use thiserror::Error;

/// Topics for queue events.
pub mod topics {
    /// A message was admitted to a queue.
    pub const ENQUEUED: &str = "queue.enqueued";
    /// A message was removed from a queue.
    pub const DEQUEUED: &str = "queue.dequeued";
    /// A peek claimed a message for a transaction.
    pub const CLAIMED: &str = "queue.claimed";
    /// A transaction's claims were released.
    pub const RELEASED: &str = "queue.released";
}

/// State change reported by a queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueueEvent {
    Enqueued {
        endpoint: String,
        message_id: MessageId,
        priority: Priority,
        sequence: Sequence,
        transaction: Option<TransactionToken>,
    },
    Dequeued {
        endpoint: String,
        message_id: MessageId,
        transaction: Option<TransactionToken>,
    },
    Claimed {
        endpoint: String,
        message_id: MessageId,
        transaction: TransactionToken,
    },
    Released {
        endpoint: String,
        transaction: TransactionToken,
        message_ids: Vec<MessageId>,
    },
}

impl QueueEvent {
    /// Topic this event is published under.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Enqueued { .. } => topics::ENQUEUED,
            Self::Dequeued { .. } => topics::DEQUEUED,
            Self::Claimed { .. } => topics::CLAIMED,
            Self::Released { .. } => topics::RELEASED,
        }
    }

    /// Endpoint of the queue that produced the event.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Enqueued { endpoint, .. }
            | Self::Dequeued { endpoint, .. }
            | Self::Claimed { endpoint, .. }
            | Self::Released { endpoint, .. } => endpoint,
        }
    }
}

/// Event publisher trait for delivery queues.
///
/// Implementations connect to the broker's event bus.
pub trait QueueEventPublisher: Send + Sync {
    /// Publishes a queue state change.
    fn publish(&self, event: QueueEvent) -> Result<(), PublishError>;
}

/// Error type for publish operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The event bus is not connected.
    #[error("Event bus not connected")]
    NotConnected,
    /// The topic does not exist.
    #[error("Topic not found: {0}")]
    TopicNotFound(String),
    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// No-op publisher for running without an event bus.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl QueueEventPublisher for NoOpPublisher {
    fn publish(&self, _event: QueueEvent) -> Result<(), PublishError> {
        Ok(())
    }
}

/// Recording publisher for tests.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<QueueEvent>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far.
    pub fn events(&self) -> Vec<QueueEvent> {
        self.events.lock().clone()
    }

    /// Published events under `topic`.
    pub fn events_for(&self, topic: &str) -> Vec<QueueEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.topic() == topic)
            .cloned()
            .collect()
    }
}

impl QueueEventPublisher for RecordingPublisher {
    fn publish(&self, event: QueueEvent) -> Result<(), PublishError> {
        self.events.lock().push(event);
        Ok(())
    }
}
