//! Core domain entities for the delivery queue.
//!
//! Defines the per-entry lock state machine and the stored entry.

// Re-export from shared-types for convenience
pub use shared_types::{MessageId, Priority, QueuedMessageInfo, TransactionToken};

/// Sequence number assigned at enqueue time.
pub type Sequence = u64;

/// Lock state of a queue entry.
///
/// State machine:
/// ```text
/// [UNLOCKED] ──peek(T)──→ [LOCKED(T)] ──unlock(T)──→ [UNLOCKED]
///      ↑
///  enqueue(None)            enqueue(T) starts here
/// ```
/// Dequeue removes the entry from either state, provided it is visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LockOwner {
    /// Visible to every caller.
    #[default]
    Unlocked,
    /// Visible only to the owning transaction.
    Locked(TransactionToken),
}

impl LockOwner {
    /// Initial owner for an entry produced under `transaction`.
    pub fn from_transaction(transaction: Option<TransactionToken>) -> Self {
        match transaction {
            Some(token) => Self::Locked(token),
            None => Self::Unlocked,
        }
    }

    /// Returns the owning transaction, if any.
    pub fn owner(&self) -> Option<TransactionToken> {
        match self {
            Self::Unlocked => None,
            Self::Locked(token) => Some(*token),
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }

    /// An entry is visible to `transaction` iff it is unlocked or owned by it.
    pub fn is_visible_to(&self, transaction: Option<TransactionToken>) -> bool {
        match self {
            Self::Unlocked => true,
            Self::Locked(owner) => transaction == Some(*owner),
        }
    }
}

/// A message stored in the queue with its ordering and lock metadata.
///
/// Ordering key is `(priority desc, sequence asc)` and never changes while
/// the entry is stored.
#[derive(Clone, Debug)]
pub struct QueueEntry<P> {
    /// The message as handed over by the broker.
    pub message: QueuedMessageInfo<P>,
    /// Per-queue insertion sequence.
    pub sequence: Sequence,
    /// Current lock state. Mutated only through `claim` and `release`.
    lock_owner: LockOwner,
}

impl<P> QueueEntry<P> {
    /// Creates an entry locked to `transaction` (unlocked when `None`).
    pub fn new(
        message: QueuedMessageInfo<P>,
        sequence: Sequence,
        transaction: Option<TransactionToken>,
    ) -> Self {
        Self {
            message,
            sequence,
            lock_owner: LockOwner::from_transaction(transaction),
        }
    }

    pub fn id(&self) -> MessageId {
        self.message.id
    }

    pub fn priority(&self) -> Priority {
        self.message.priority
    }

    pub fn lock_owner(&self) -> LockOwner {
        self.lock_owner
    }

    pub fn is_visible_to(&self, transaction: Option<TransactionToken>) -> bool {
        self.lock_owner.is_visible_to(transaction)
    }

    /// Moves an unlocked entry to `Locked(transaction)`.
    ///
    /// # Errors
    /// Returns error if the entry is already locked (to anyone).
    pub(crate) fn claim(&mut self, transaction: TransactionToken) -> Result<(), &'static str> {
        if self.lock_owner.is_locked() {
            return Err("Entry already locked");
        }
        self.lock_owner = LockOwner::Locked(transaction);
        Ok(())
    }

    /// Returns a locked entry to `Unlocked`.
    ///
    /// # Errors
    /// Returns error if the entry is not locked.
    pub(crate) fn release(&mut self) -> Result<(), &'static str> {
        if !self.lock_owner.is_locked() {
            return Err("Entry not locked");
        }
        self.lock_owner = LockOwner::Unlocked;
        Ok(())
    }

    /// Consumes the entry, handing the message back to the caller.
    pub fn into_message(self) -> QueuedMessageInfo<P> {
        self.message
    }
}
