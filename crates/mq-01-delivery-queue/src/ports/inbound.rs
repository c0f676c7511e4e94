//! # Inbound Port - TransactionalQueueApi
//!
//! Primary driving port used by the broker dispatch loop and its workers.
//!
//! | Method | Caller |
//! |--------|--------|
//! | `enqueue` | Broker dispatch loop |
//! | `peek` / `dequeue` | Worker, optionally inside a transaction |
//! | `unlock` | Broker, on transaction abort |

use crate::domain::{QueueError, QueuedMessageInfo, TransactionToken};

/// Primary API of a delivery queue.
///
/// Every method is a bounded, non-blocking operation. "Nothing available"
/// is reported as `None`, never as an error and never by waiting.
///
/// # Example
///
/// ```rust,ignore
/// use mq_01_delivery_queue::ports::TransactionalQueueApi;
///
/// fn work(queue: &dyn TransactionalQueueApi<Vec<u8>>, tx: TransactionToken) {
///     // Claim a candidate under the transaction
///     if let Some(msg) = queue.peek(Some(tx)) {
///         if can_handle(&msg) {
///             // Finalize removal
///             queue.dequeue(Some(tx));
///         } else {
///             // Abandon it for other workers
///             queue.unlock(tx);
///         }
///     }
/// }
/// ```
pub trait TransactionalQueueApi<P>: Send + Sync {
    /// Adds a message, locked to `transaction` when one is given.
    ///
    /// # Errors
    /// - `DuplicateMessage`: id already stored in this queue
    /// - `QueueFull`: configured depth reached
    fn enqueue(
        &self,
        transaction: Option<TransactionToken>,
        message: QueuedMessageInfo<P>,
    ) -> Result<(), QueueError>;

    /// Removes and returns the best message visible to `transaction`.
    fn dequeue(&self, transaction: Option<TransactionToken>) -> Option<QueuedMessageInfo<P>>;

    /// Returns the best message visible to `transaction` without removing it.
    ///
    /// An unlocked message is claimed for `transaction` when one is given.
    fn peek(&self, transaction: Option<TransactionToken>) -> Option<QueuedMessageInfo<P>>;

    /// Releases every message held by `transaction`. Returns how many.
    fn unlock(&self, transaction: TransactionToken) -> usize;

    /// Number of stored messages, locked or not.
    fn count(&self) -> usize;

    /// Endpoint identity fixed at construction.
    fn endpoint(&self) -> &str;
}
