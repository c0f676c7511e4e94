//! # Lock Table
//!
//! Maps a transaction token to the set of entries it currently holds, so a
//! transaction holding `k` entries is released in O(k) instead of a scan.
//!
//! Callers keep this table and each entry's `LockOwner` consistent inside the
//! same critical section. The absent transaction never appears here.

use super::entities::{MessageId, TransactionToken};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct LockTable {
    held: HashMap<TransactionToken, HashSet<MessageId>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `transaction` holds `id`. Returns false if already recorded.
    pub fn insert(&mut self, transaction: TransactionToken, id: MessageId) -> bool {
        self.held.entry(transaction).or_default().insert(id)
    }

    /// Forgets a single held entry, dropping the transaction when it holds nothing.
    pub fn remove(&mut self, transaction: TransactionToken, id: &MessageId) -> bool {
        let Some(ids) = self.held.get_mut(&transaction) else {
            return false;
        };
        let removed = ids.remove(id);
        if ids.is_empty() {
            self.held.remove(&transaction);
        }
        removed
    }

    /// Removes and returns everything held by `transaction`.
    pub fn take(&mut self, transaction: TransactionToken) -> HashSet<MessageId> {
        self.held.remove(&transaction).unwrap_or_default()
    }

    pub fn holds(&self, transaction: TransactionToken, id: &MessageId) -> bool {
        self.held
            .get(&transaction)
            .is_some_and(|ids| ids.contains(id))
    }

    /// Number of entries held by `transaction`.
    pub fn held_count(&self, transaction: TransactionToken) -> usize {
        self.held.get(&transaction).map_or(0, HashSet::len)
    }

    /// Ids held by `transaction`, in no particular order.
    pub fn held_by(&self, transaction: TransactionToken) -> impl Iterator<Item = &MessageId> {
        self.held.get(&transaction).into_iter().flatten()
    }

    /// Total number of locked entries across all transactions.
    pub fn locked_count(&self) -> usize {
        self.held.values().map(HashSet::len).sum()
    }

    /// Transactions holding at least one entry.
    pub fn transactions(&self) -> impl Iterator<Item = &TransactionToken> {
        self.held.keys()
    }
}
