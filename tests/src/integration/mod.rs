//! # Integration Tests
//!
//! Exercise the delivery queue through its public surface only: the
//! `QueueManager` registry, `TransactionalQueue` and the
//! `TransactionalQueueApi` port.

pub mod flows;
