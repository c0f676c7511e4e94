//! # Entry Store - Priority Delivery with Transaction Locks
//!
//! Unsynchronized core of a delivery queue. The service layer wraps it in a
//! single mutex; every method here assumes exclusive access.
//!
//! ## Data Structures
//!
//! - `index`: five FIFO buckets in delivery order
//! - `locks`: transaction → held entry ids
//! - `keys`: id → `(priority, sequence)` for duplicate checks and O(log n) lookup
//!
//! ## Invariants Enforced
//!
//! - INVARIANT-1: `(priority, sequence)` never changes while an entry is stored
//! - INVARIANT-2: `LockOwner` changes only in `enqueue`, `visit` (claim) and `unlock`
//! - INVARIANT-3: every `Locked(T)` entry is in `locks[T]` and vice versa
//! - INVARIANT-4: `len()` counts every stored entry, locked or not

use super::entities::{
    LockOwner, MessageId, QueueEntry, QueuedMessageInfo, Sequence, TransactionToken,
};
use super::errors::QueueError;
use super::lock_table::LockTable;
use super::priority_index::PriorityIndex;
use super::value_objects::{Access, DeliveryKey, QueueStatus, Visit};
use crate::config::QueueConfig;
use std::collections::HashMap;

#[derive(Debug)]
pub struct EntryStore<P> {
    /// Entries in delivery order.
    index: PriorityIndex<P>,

    /// Entries held per transaction.
    locks: LockTable,

    /// Ordering key of every stored entry.
    keys: HashMap<MessageId, DeliveryKey>,

    /// Sequence assigned to the next enqueued entry.
    next_sequence: Sequence,

    /// Optional depth limit.
    max_depth: Option<usize>,
}

impl<P> EntryStore<P> {
    /// Creates an empty store.
    pub fn new(config: &QueueConfig) -> Self {
        Self {
            index: PriorityIndex::new(config.bucket_capacity),
            locks: LockTable::new(),
            keys: HashMap::new(),
            next_sequence: 0,
            max_depth: config.max_depth,
        }
    }

    /// Number of stored entries, locked or not.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.keys.contains_key(id)
    }

    /// Adds a message at the tail of its priority bucket.
    ///
    /// A `Some` transaction owns the entry from creation.
    ///
    /// # Errors
    /// - `DuplicateMessage` if the id is already stored
    /// - `QueueFull` if the configured depth is reached
    ///
    /// Nothing is modified when an error is returned.
    pub fn enqueue(
        &mut self,
        transaction: Option<TransactionToken>,
        message: QueuedMessageInfo<P>,
    ) -> Result<Sequence, QueueError> {
        if self.keys.contains_key(&message.id) {
            return Err(QueueError::DuplicateMessage(message.id));
        }

        if let Some(capacity) = self.max_depth {
            if self.index.len() >= capacity {
                return Err(QueueError::QueueFull { capacity });
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let id = message.id;
        self.keys.insert(id, DeliveryKey::new(message.priority, sequence));
        if let Some(token) = transaction {
            self.locks.insert(token, id);
        }
        self.index
            .push_back(QueueEntry::new(message, sequence, transaction));

        Ok(sequence)
    }

    /// Releases every entry held by `transaction`.
    ///
    /// Returns the released ids in delivery order. Unknown transactions
    /// release nothing.
    pub fn unlock(&mut self, transaction: TransactionToken) -> Vec<MessageId> {
        let mut released: Vec<(DeliveryKey, MessageId)> = self
            .locks
            .take(transaction)
            .into_iter()
            .filter_map(|id| self.keys.get(&id).map(|key| (*key, id)))
            .collect();
        released.sort_by_key(|(key, _)| *key);

        for (key, _) in &released {
            let entry = self
                .index
                .locate(key.priority, key.sequence)
                .and_then(|slot| self.index.get_mut(slot));
            if let Some(entry) = entry {
                let released = entry.release();
                debug_assert!(released.is_ok(), "lock table held unlocked entry {}", entry.id());
            }
        }

        released.into_iter().map(|(_, id)| id).collect()
    }

    /// Lock state of a stored entry.
    pub fn lock_owner(&self, id: &MessageId) -> Option<LockOwner> {
        self.entry(id).map(QueueEntry::lock_owner)
    }

    fn entry(&self, id: &MessageId) -> Option<&QueueEntry<P>> {
        let key = self.keys.get(id)?;
        let slot = self.index.locate(key.priority, key.sequence)?;
        self.index.get(slot)
    }

    /// Entries held by `transaction`, in delivery order.
    pub fn held_by(&self, transaction: TransactionToken) -> Vec<MessageId> {
        let mut held: Vec<(DeliveryKey, MessageId)> = self
            .locks
            .held_by(transaction)
            .filter_map(|id| self.keys.get(id).map(|key| (*key, *id)))
            .collect();
        held.sort_by_key(|(key, _)| *key);
        held.into_iter().map(|(_, id)| id).collect()
    }

    /// Takes a status snapshot.
    pub fn status(&self) -> QueueStatus {
        let total = self.index.len();
        let locked = self.locks.locked_count();
        let mut active_transactions: Vec<TransactionToken> =
            self.locks.transactions().copied().collect();
        active_transactions.sort_by_key(TransactionToken::as_uuid);

        QueueStatus {
            total,
            locked,
            available: total.saturating_sub(locked),
            depth_by_priority: self.index.depths(),
            active_transactions,
            next_sequence: self.next_sequence,
        }
    }

    /// Checks that the lock table mirrors every entry's `LockOwner`.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let locked_entries = self
            .index
            .iter()
            .filter(|entry| match entry.lock_owner() {
                LockOwner::Unlocked => true,
                LockOwner::Locked(owner) => self.locks.holds(owner, &entry.id()),
            })
            .count();
        locked_entries == self.index.len()
            && self.locks.locked_count()
                == self.index.iter().filter(|e| e.lock_owner().is_locked()).count()
            && self.keys.len() == self.index.len()
    }
}

impl<P: Clone> EntryStore<P> {
    /// Finds the first entry visible to `transaction` in delivery order and
    /// applies `access` to it.
    ///
    /// - `Access::Remove` removes the entry and its lock record.
    /// - `Access::ClaimIfUnlocked` leaves it stored; an unlocked entry is
    ///   claimed for `transaction` when one is given.
    ///
    /// Returns `None` when nothing is visible.
    pub fn visit(
        &mut self,
        transaction: Option<TransactionToken>,
        access: Access,
    ) -> Option<Visit<P>> {
        let slot = self.index.position(|entry| entry.is_visible_to(transaction))?;

        match access {
            Access::Remove => {
                let entry = self.index.remove(slot)?;
                let id = entry.id();
                self.keys.remove(&id);
                if let Some(owner) = entry.lock_owner().owner() {
                    self.locks.remove(owner, &id);
                }
                Some(Visit::Removed(entry))
            }
            Access::ClaimIfUnlocked => {
                let entry = self.index.get_mut(slot)?;
                let claimant = transaction.filter(|_| !entry.lock_owner().is_locked());
                let claimed = match claimant {
                    Some(token) => entry.claim(token).is_ok(),
                    None => false,
                };
                let entry = entry.clone();

                if let (true, Some(token)) = (claimed, claimant) {
                    self.locks.insert(token, entry.id());
                }
                Some(Visit::Observed { entry, claimed })
            }
        }
    }

    /// Removes and returns the first entry visible to `transaction`.
    pub fn dequeue(&mut self, transaction: Option<TransactionToken>) -> Option<QueueEntry<P>> {
        self.visit(transaction, Access::Remove).map(Visit::into_entry)
    }

    /// Returns the first entry visible to `transaction`, claiming it if unlocked.
    pub fn peek(&mut self, transaction: Option<TransactionToken>) -> Option<QueueEntry<P>> {
        self.visit(transaction, Access::ClaimIfUnlocked)
            .map(Visit::into_entry)
    }
}
