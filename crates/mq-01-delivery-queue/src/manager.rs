//! # Queue Manager - Endpoint Registry
//!
//! Broker-facing registry of delivery queues keyed by endpoint.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 QueueManager                 │
//! │                                              │
//! │   "orders"  ──→ Arc<TransactionalQueue>      │
//! │   "billing" ──→ Arc<TransactionalQueue>      │
//! │   ...                                        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! A transaction may hold messages in several queues. When it aborts, the
//! broker calls `unlock_all` once instead of visiting every queue itself.

use crate::adapters::{NoOpPublisher, QueueEventPublisher};
use crate::config::{QueueConfig, QueueManagerConfig};
use crate::domain::{QueueError, TransactionToken};
use crate::service::TransactionalQueue;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry of queues keyed by endpoint.
pub struct QueueManager<P = Vec<u8>> {
    queues: RwLock<HashMap<String, Arc<TransactionalQueue<P>>>>,
    publisher: Arc<dyn QueueEventPublisher>,
}

impl<P: Clone + Send> QueueManager<P> {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
            publisher: Arc::new(NoOpPublisher),
        }
    }

    /// Creates a manager with every queue listed in `config`.
    ///
    /// # Errors
    /// Fails on the first invalid or duplicate queue entry.
    pub fn from_config(config: QueueManagerConfig) -> Result<Self, QueueError> {
        Self::new().with_queues(config)
    }

    /// Publisher handed to every queue created afterwards.
    pub fn with_publisher(mut self, publisher: Arc<dyn QueueEventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Registers every queue listed in `config`.
    pub fn with_queues(self, config: QueueManagerConfig) -> Result<Self, QueueError> {
        for queue in config.queues {
            self.create(queue)?;
        }
        Ok(self)
    }

    /// Registers a new queue.
    ///
    /// # Errors
    /// - `EndpointExists` if the endpoint is taken
    /// - `InvalidConfig` if `config` does not validate
    pub fn create(&self, config: QueueConfig) -> Result<Arc<TransactionalQueue<P>>, QueueError> {
        let mut queues = self.queues.write();
        if queues.contains_key(&config.endpoint) {
            return Err(QueueError::EndpointExists(config.endpoint));
        }

        let endpoint = config.endpoint.clone();
        let queue = Arc::new(
            TransactionalQueue::with_config(config)?.with_publisher(self.publisher.clone()),
        );
        queues.insert(endpoint.clone(), queue.clone());

        info!(%endpoint, "Queue registered");
        Ok(queue)
    }

    /// Returns the queue for `endpoint`, creating an unbounded one if missing.
    pub fn get_or_create(&self, endpoint: &str) -> Arc<TransactionalQueue<P>> {
        if let Some(queue) = self.queues.read().get(endpoint) {
            return queue.clone();
        }

        let mut queues = self.queues.write();
        queues
            .entry(endpoint.to_string())
            .or_insert_with(|| {
                info!(%endpoint, "Queue registered on first use");
                Arc::new(
                    TransactionalQueue::new(endpoint).with_publisher(self.publisher.clone()),
                )
            })
            .clone()
    }

    /// # Errors
    /// `EndpointNotFound` if no queue is registered for `endpoint`.
    pub fn get(&self, endpoint: &str) -> Result<Arc<TransactionalQueue<P>>, QueueError> {
        self.queues
            .read()
            .get(endpoint)
            .cloned()
            .ok_or_else(|| QueueError::EndpointNotFound(endpoint.to_string()))
    }

    /// Unregisters a queue. Workers still holding the `Arc` keep using it.
    ///
    /// # Errors
    /// `EndpointNotFound` if no queue is registered for `endpoint`.
    pub fn remove(&self, endpoint: &str) -> Result<Arc<TransactionalQueue<P>>, QueueError> {
        let queue = self
            .queues
            .write()
            .remove(endpoint)
            .ok_or_else(|| QueueError::EndpointNotFound(endpoint.to_string()))?;

        info!(%endpoint, remaining = queue.count(), "Queue unregistered");
        Ok(queue)
    }

    /// Registered endpoints, sorted.
    pub fn endpoints(&self) -> Vec<String> {
        let mut endpoints: Vec<String> = self.queues.read().keys().cloned().collect();
        endpoints.sort();
        endpoints
    }

    pub fn len(&self) -> usize {
        self.queues.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.read().is_empty()
    }

    /// Releases `transaction`'s claims in every registered queue.
    ///
    /// Returns the total number of released messages.
    pub fn unlock_all(&self, transaction: TransactionToken) -> usize {
        // Snapshot so queue locks are never taken while holding the registry lock
        let queues: Vec<Arc<TransactionalQueue<P>>> =
            self.queues.read().values().cloned().collect();

        let released: usize = queues.iter().map(|q| q.unlock(transaction)).sum();
        debug!(%transaction, released, queues = queues.len(), "Transaction released across queues");
        released
    }
}

impl<P: Clone + Send> Default for QueueManager<P> {
    fn default() -> Self {
        Self::new()
    }
}
