//! # Delivery Queue Subsystem
//!
//! **Subsystem ID:** 1
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Holds pending messages for a broker endpoint, serves them in priority
//! order and keeps a message claimed by one transaction invisible to every
//! other transaction until it is released.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Order fixed by `(priority desc, sequence asc)` | `domain/priority_index.rs` - append-only FIFO buckets |
//! | INVARIANT-2 | Lock owner changes only via enqueue / peek / unlock | `domain/entities.rs` - private `lock_owner`, `claim()` / `release()` |
//! | INVARIANT-3 | Lock table mirrors entry lock owners | `domain/store.rs` - both updated in one `&mut` call |
//! | INVARIANT-4 | Count includes locked entries | `domain/store.rs` - `len()` reads the index |
//!
//! ## Claim / Finalize / Abandon
//!
//! ```text
//! [UNLOCKED] ──peek(T)──→ [LOCKED(T)] ──dequeue(T)──→ [REMOVED]
//!     │                        │
//!     │                        └── unlock(T) ──→ [UNLOCKED]
//!     └── dequeue(any) ──→ [REMOVED]
//! ```
//!
//! | Stage | Method | Effect |
//! |-------|--------|--------|
//! | Produce | `queue.enqueue(tx, msg)` | Stored; locked to `tx` when given |
//! | Claim | `queue.peek(Some(tx))` | First visible unlocked message locked to `tx` |
//! | Finalize | `queue.dequeue(tx)` | First visible message removed permanently |
//! | Abandon | `queue.unlock(tx)` | Everything held by `tx` unlocked, order kept |
//!
//! Dequeue is final at this layer; compensation after a higher-level abort is
//! the broker's concern.
//!
//! ## Concurrency
//!
//! One `parking_lot::Mutex` per queue guards the whole store. No operation
//! waits for data: "nothing visible" returns `None` immediately.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - Queue event publisher implementations              │
//! │  manager.rs - Endpoint registry, cross-queue unlock             │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs - TransactionalQueueApi trait                 │
//! │  service.rs       - TransactionalQueue (synchronized facade)    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/entities.rs       - QueueEntry, LockOwner               │
//! │  domain/priority_index.rs - Five FIFO buckets                   │
//! │  domain/lock_table.rs     - Transaction → held ids              │
//! │  domain/store.rs          - EntryStore                          │
//! │  domain/value_objects.rs  - DeliveryKey, Visit, QueueStatus     │
//! │  domain/errors.rs         - QueueError enum                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod manager;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use config::{QueueConfig, QueueManagerConfig};
pub use domain::*;
pub use manager::QueueManager;
pub use ports::TransactionalQueueApi;
pub use service::TransactionalQueue;
