//! Adapters layer for the Delivery Queue subsystem.
//!
//! Provides event bus integration for queue state changes.

pub mod publisher;

pub use publisher::{
    topics, NoOpPublisher, PublishError, QueueEvent, QueueEventPublisher, RecordingPublisher,
};
