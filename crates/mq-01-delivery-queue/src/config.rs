//! Configuration for the Delivery Queue subsystem

use crate::domain::errors::QueueError;
use serde::{Deserialize, Serialize};

/// Upper bound for the per-bucket pre-allocation hint.
pub const MAX_BUCKET_CAPACITY: usize = 1 << 20;

/// Queue configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Endpoint identity. Opaque to the queue.
    pub endpoint: String,
    /// Maximum stored entries (`None` = unbounded)
    pub max_depth: Option<usize>,
    /// Initial capacity of each priority bucket
    pub bucket_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            endpoint: "default".to_string(),
            max_depth: None,
            bucket_capacity: 16,
        }
    }
}

impl QueueConfig {
    /// Default configuration for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Creates a minimal config for testing.
    pub fn for_testing(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_depth: None,
            bucket_capacity: 2,
        }
    }

    /// Builder-style method to bound the queue depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Rejects settings that can never admit a message.
    pub fn validate(&self) -> Result<(), QueueError> {
        if self.max_depth == Some(0) {
            return Err(QueueError::InvalidConfig(
                "max_depth must be greater than 0".to_string(),
            ));
        }

        if self.bucket_capacity > MAX_BUCKET_CAPACITY {
            return Err(QueueError::InvalidConfig(format!(
                "bucket_capacity {} exceeds {}",
                self.bucket_capacity, MAX_BUCKET_CAPACITY
            )));
        }

        Ok(())
    }
}

/// Set of queues a `QueueManager` registers at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueManagerConfig {
    pub queues: Vec<QueueConfig>,
}
