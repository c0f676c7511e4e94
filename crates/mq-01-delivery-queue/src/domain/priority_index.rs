//! # Priority Index
//!
//! Five FIFO buckets, one per priority level, indexed by ordinal.
//!
//! Delivery order is bucket `VeryHigh` down to `VeryLow`, front to back
//! within a bucket. Entries are appended with increasing sequence numbers
//! and never reordered, so every bucket stays sorted by sequence and an
//! entry can be located by binary search.

use super::entities::{Priority, QueueEntry, Sequence};
use super::value_objects::Slot;
use std::collections::VecDeque;

#[derive(Debug)]
pub struct PriorityIndex<P> {
    buckets: [VecDeque<QueueEntry<P>>; Priority::LEVELS],
    len: usize,
}

impl<P> PriorityIndex<P> {
    /// Creates an empty index, pre-allocating `bucket_capacity` per level.
    pub fn new(bucket_capacity: usize) -> Self {
        Self {
            buckets: std::array::from_fn(|_| VecDeque::with_capacity(bucket_capacity)),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket(&self, priority: Priority) -> Option<&VecDeque<QueueEntry<P>>> {
        self.buckets.get(priority.ordinal())
    }

    fn bucket_mut(&mut self, priority: Priority) -> Option<&mut VecDeque<QueueEntry<P>>> {
        self.buckets.get_mut(priority.ordinal())
    }

    /// Appends an entry at the tail of its priority bucket.
    pub fn push_back(&mut self, entry: QueueEntry<P>) {
        if let Some(bucket) = self.bucket_mut(entry.priority()) {
            bucket.push_back(entry);
            self.len += 1;
        }
    }

    /// Finds the first entry in delivery order satisfying `predicate`.
    pub fn position<F>(&self, mut predicate: F) -> Option<Slot>
    where
        F: FnMut(&QueueEntry<P>) -> bool,
    {
        Priority::ALL.iter().rev().find_map(|&priority| {
            self.bucket(priority)?
                .iter()
                .position(&mut predicate)
                .map(|index| Slot { priority, index })
        })
    }

    /// Locates the entry with `sequence` in the `priority` bucket.
    pub fn locate(&self, priority: Priority, sequence: Sequence) -> Option<Slot> {
        let bucket = self.bucket(priority)?;
        bucket
            .binary_search_by_key(&sequence, |entry| entry.sequence)
            .ok()
            .map(|index| Slot { priority, index })
    }

    pub fn get(&self, slot: Slot) -> Option<&QueueEntry<P>> {
        self.bucket(slot.priority)?.get(slot.index)
    }

    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut QueueEntry<P>> {
        self.bucket_mut(slot.priority)?.get_mut(slot.index)
    }

    /// Removes the entry at `slot`, preserving the order of the rest.
    pub fn remove(&mut self, slot: Slot) -> Option<QueueEntry<P>> {
        let removed = self.bucket_mut(slot.priority)?.remove(slot.index);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Iterates all entries in delivery order.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry<P>> {
        self.buckets.iter().rev().flat_map(|bucket| bucket.iter())
    }

    /// Number of entries per priority level, indexed by ordinal.
    pub fn depths(&self) -> [usize; Priority::LEVELS] {
        std::array::from_fn(|i| self.buckets.get(i).map_or(0, VecDeque::len))
    }
}
