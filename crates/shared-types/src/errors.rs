//! # Error Types
//!
//! Errors raised while converting external representations into shared types.

use thiserror::Error;

/// Errors produced when decoding a priority level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriorityError {
    /// Ordinal outside `0..=4`.
    #[error("Priority ordinal {0} out of range (expected 0..=4)")]
    OrdinalOutOfRange(u8),

    /// Name that does not match any level.
    #[error("Unknown priority level: {0}")]
    UnknownLevel(String),
}
