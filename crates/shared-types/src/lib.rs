//! # Shared Types Crate
//!
//! Cross-subsystem message types for the queuing layer.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: The broker and every delivery subsystem use
//!   the same `QueuedMessageInfo` descriptor and `Priority` levels.
//! - **Opaque Payloads**: Delivery code never inspects `payload`; only the id
//!   and the priority are meaningful to it.
//! - **Identity Tokens**: Transactions are `TransactionToken`s compared by
//!   identity. "No transaction" is `Option::None`, never a sentinel token.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
