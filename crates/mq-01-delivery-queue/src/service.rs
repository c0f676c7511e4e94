//! Transactional Queue Service
//!
//! Synchronized facade over `EntryStore`. Every operation runs inside one
//! exclusive critical section, so Peek's check-then-claim and Dequeue's
//! check-then-remove are atomic with respect to every other caller.
//! Events are published after the lock is released.

use crate::adapters::{NoOpPublisher, QueueEvent, QueueEventPublisher};
use crate::config::QueueConfig;
use crate::domain::{
    Access, EntryStore, LockOwner, MessageId, QueueError, QueueStatus, QueuedMessageInfo,
    TransactionToken, Visit,
};
use crate::ports::inbound::TransactionalQueueApi;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Transaction-scoped priority delivery queue for one endpoint.
///
/// Share it between workers as `Arc<TransactionalQueue<P>>`.
pub struct TransactionalQueue<P = Vec<u8>> {
    endpoint: String,
    store: Mutex<EntryStore<P>>,
    publisher: Arc<dyn QueueEventPublisher>,
}

impl<P: Clone + Send> TransactionalQueue<P> {
    /// Create an unbounded queue for `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::from_validated(QueueConfig::new(endpoint))
    }

    /// Create a queue with custom config
    pub fn with_config(config: QueueConfig) -> Result<Self, QueueError> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: QueueConfig) -> Self {
        Self {
            store: Mutex::new(EntryStore::new(&config)),
            endpoint: config.endpoint,
            publisher: Arc::new(NoOpPublisher),
        }
    }

    /// Replace the event publisher
    pub fn with_publisher(mut self, publisher: Arc<dyn QueueEventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Adds `message` at the tail of its priority level.
    ///
    /// A `Some` transaction owns the message from creation: it stays
    /// invisible to everyone else until that transaction unlocks it.
    ///
    /// # Errors
    /// - `DuplicateMessage` if the id is already stored
    /// - `QueueFull` if the configured depth is reached
    pub fn enqueue(
        &self,
        transaction: Option<TransactionToken>,
        message: QueuedMessageInfo<P>,
    ) -> Result<(), QueueError> {
        let message_id = message.id;
        let priority = message.priority;

        let result = self.store.lock().enqueue(transaction, message);

        match result {
            Ok(sequence) => {
                debug!(
                    endpoint = %self.endpoint,
                    %message_id,
                    %priority,
                    sequence,
                    ?transaction,
                    "Message enqueued"
                );
                self.publish(QueueEvent::Enqueued {
                    endpoint: self.endpoint.clone(),
                    message_id,
                    priority,
                    sequence,
                    transaction,
                });
                Ok(())
            }
            Err(error) => {
                warn!(
                    endpoint = %self.endpoint,
                    %message_id,
                    %error,
                    "Enqueue rejected"
                );
                Err(error)
            }
        }
    }

    /// Removes and returns the highest-priority, earliest message visible to
    /// `transaction`. Removal is final at this layer.
    pub fn dequeue(&self, transaction: Option<TransactionToken>) -> Option<QueuedMessageInfo<P>> {
        let entry = self.store.lock().dequeue(transaction)?;

        debug!(
            endpoint = %self.endpoint,
            message_id = %entry.id(),
            priority = %entry.priority(),
            sequence = entry.sequence,
            ?transaction,
            "Message dequeued"
        );
        self.publish(QueueEvent::Dequeued {
            endpoint: self.endpoint.clone(),
            message_id: entry.id(),
            transaction,
        });

        Some(entry.into_message())
    }

    /// Returns the message `dequeue` would return, without removing it.
    ///
    /// If that message is unlocked and `transaction` is given, it is claimed
    /// for `transaction`. Repeated peeks by the same transaction return the
    /// same message. `None` browses without claiming.
    pub fn peek(&self, transaction: Option<TransactionToken>) -> Option<QueuedMessageInfo<P>> {
        let visit = self
            .store
            .lock()
            .visit(transaction, Access::ClaimIfUnlocked)?;

        if let (Visit::Observed { entry, claimed: true }, Some(token)) = (&visit, transaction) {
            debug!(
                endpoint = %self.endpoint,
                message_id = %entry.id(),
                transaction = %token,
                "Message claimed"
            );
            self.publish(QueueEvent::Claimed {
                endpoint: self.endpoint.clone(),
                message_id: entry.id(),
                transaction: token,
            });
        }

        Some(visit.into_entry().into_message())
    }

    /// Releases every message held by `transaction`, keeping their original
    /// order. Unknown transactions are a no-op. Returns how many were released.
    pub fn unlock(&self, transaction: TransactionToken) -> usize {
        let released = self.store.lock().unlock(transaction);

        if released.is_empty() {
            trace!(endpoint = %self.endpoint, %transaction, "Unlock released nothing");
            return 0;
        }

        let count = released.len();
        debug!(
            endpoint = %self.endpoint,
            %transaction,
            released = count,
            "Transaction locks released"
        );
        self.publish(QueueEvent::Released {
            endpoint: self.endpoint.clone(),
            transaction,
            message_ids: released,
        });

        count
    }

    /// Number of stored messages, locked or not.
    pub fn count(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.store.lock().contains(id)
    }

    /// Lock state of a stored message, `None` if not stored.
    pub fn lock_owner(&self, id: &MessageId) -> Option<LockOwner> {
        self.store.lock().lock_owner(id)
    }

    /// Messages held by `transaction`, in delivery order.
    pub fn held_by(&self, transaction: TransactionToken) -> Vec<MessageId> {
        self.store.lock().held_by(transaction)
    }

    /// Consistent snapshot of the queue's counters.
    pub fn status(&self) -> QueueStatus {
        self.store.lock().status()
    }

    fn publish(&self, event: QueueEvent) {
        let topic = event.topic();
        if let Err(error) = self.publisher.publish(event) {
            warn!(endpoint = %self.endpoint, topic, %error, "Failed to publish queue event");
        }
    }
}

impl<P: Clone + Send> TransactionalQueueApi<P> for TransactionalQueue<P> {
    fn enqueue(
        &self,
        transaction: Option<TransactionToken>,
        message: QueuedMessageInfo<P>,
    ) -> Result<(), QueueError> {
        TransactionalQueue::enqueue(self, transaction, message)
    }

    fn dequeue(&self, transaction: Option<TransactionToken>) -> Option<QueuedMessageInfo<P>> {
        TransactionalQueue::dequeue(self, transaction)
    }

    fn peek(&self, transaction: Option<TransactionToken>) -> Option<QueuedMessageInfo<P>> {
        TransactionalQueue::peek(self, transaction)
    }

    fn unlock(&self, transaction: TransactionToken) -> usize {
        TransactionalQueue::unlock(self, transaction)
    }

    fn count(&self) -> usize {
        TransactionalQueue::count(self)
    }

    fn endpoint(&self) -> &str {
        TransactionalQueue::endpoint(self)
    }
}

impl<P> std::fmt::Debug for TransactionalQueue<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionalQueue")
            .field("endpoint", &self.endpoint)
            .field("count", &self.store.lock().len())
            .finish_non_exhaustive()
    }
}
