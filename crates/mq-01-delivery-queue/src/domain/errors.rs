//! Delivery queue error types.
//!
//! Only precondition violations are errors. "Nothing visible" is an empty
//! result and unlocking an unknown transaction is a no-op.

use shared_types::MessageId;
use thiserror::Error;

/// Delivery queue error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A message with this id is already stored in the queue.
    ///
    /// Only stored messages are checked: once a message is dequeued its id
    /// may be enqueued again.
    #[error("Duplicate message: {0}")]
    DuplicateMessage(MessageId),

    /// The configured maximum depth has been reached.
    #[error("Queue full at {capacity} messages")]
    QueueFull { capacity: usize },

    /// Configuration rejected by `QueueConfig::validate`.
    #[error("Invalid queue configuration: {0}")]
    InvalidConfig(String),

    /// A queue is already registered for this endpoint.
    #[error("Endpoint already registered: {0}")]
    EndpointExists(String),

    /// No queue is registered for this endpoint.
    #[error("Endpoint not found: {0}")]
    EndpointNotFound(String),
}
