//! # Domain Layer - Delivery Queue Subsystem
//!
//! Pure, unsynchronized queue logic. Locking lives in the service layer.
//!
//! ## Components
//!
//! - `entities`: `QueueEntry`, `LockOwner` state machine
//! - `priority_index`: five FIFO buckets in delivery order
//! - `lock_table`: transaction → held entry ids
//! - `store`: `EntryStore` composing the above
//! - `value_objects`: `Slot`, `DeliveryKey`, `Access`, `Visit`, `QueueStatus`
//! - `errors`: `QueueError` enumeration

pub mod entities;
pub mod errors;
pub mod lock_table;
pub mod priority_index;
pub mod store;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use lock_table::LockTable;
pub use priority_index::PriorityIndex;
pub use store::EntryStore;
pub use value_objects::*;
