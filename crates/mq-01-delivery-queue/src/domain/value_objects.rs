//! Value objects for the delivery queue.
//!
//! Small immutable types used for addressing entries and reporting state.

use super::entities::{Priority, QueueEntry, Sequence, TransactionToken};
use std::cmp::{Ordering, Reverse};

/// Position of an entry inside the priority index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Bucket holding the entry.
    pub priority: Priority,
    /// Offset from the front of the bucket.
    pub index: usize,
}

/// Ordering key of a stored entry.
///
/// Implements `Ord` such that higher priority sorts first and ties are broken
/// by enqueue order (FIFO).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeliveryKey {
    pub priority: Priority,
    pub sequence: Sequence,
}

impl DeliveryKey {
    pub fn new(priority: Priority, sequence: Sequence) -> Self {
        Self { priority, sequence }
    }
}

impl Ord for DeliveryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (Reverse(self.priority), self.sequence).cmp(&(Reverse(other.priority), other.sequence))
    }
}

impl PartialOrd for DeliveryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// What to do with the first visible entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Remove it from the queue (Dequeue).
    Remove,
    /// Leave it in place, claiming it when unlocked (Peek).
    ClaimIfUnlocked,
}

/// Outcome of visiting the first visible entry.
#[derive(Clone, Debug)]
pub enum Visit<P> {
    /// The entry was removed from the queue.
    Removed(QueueEntry<P>),
    /// The entry stays queued; `claimed` is true when this visit locked it.
    Observed { entry: QueueEntry<P>, claimed: bool },
}

impl<P> Visit<P> {
    pub fn entry(&self) -> &QueueEntry<P> {
        match self {
            Self::Removed(entry) | Self::Observed { entry, .. } => entry,
        }
    }

    pub fn into_entry(self) -> QueueEntry<P> {
        match self {
            Self::Removed(entry) | Self::Observed { entry, .. } => entry,
        }
    }
}

/// Queue status snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueueStatus {
    /// Total stored entries, locked or not.
    pub total: usize,
    /// Entries currently locked to some transaction.
    pub locked: usize,
    /// Entries visible to a caller without a transaction.
    pub available: usize,
    /// Stored entries per priority level, indexed by ordinal.
    pub depth_by_priority: [usize; Priority::LEVELS],
    /// Transactions holding at least one entry.
    pub active_transactions: Vec<TransactionToken>,
    /// Sequence the next enqueued entry will receive.
    pub next_sequence: Sequence,
}

impl QueueStatus {
    /// Depth of a single priority bucket.
    pub fn depth(&self, priority: Priority) -> usize {
        self.depth_by_priority
            .get(priority.ordinal())
            .copied()
            .unwrap_or(0)
    }
}
