//! # Core Messaging Entities
//!
//! Defines the descriptors exchanged between the broker and the delivery
//! subsystems.
//!
//! ## Clusters
//!
//! - **Messages**: `MessageId`, `QueuedMessageInfo`
//! - **Ordering**: `Priority`
//! - **Units of Work**: `TransactionToken`

use crate::errors::PriorityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: MESSAGES
// =============================================================================

/// Caller-assigned unique identifier of a queued message (128 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Builds an identifier from a raw 128-bit value.
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Returns the raw 128-bit value.
    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message handed to a delivery queue by the broker.
///
/// The payload is owned by the message provider; delivery code only reads
/// `id` and `priority`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedMessageInfo<P = Vec<u8>> {
    /// Unique identifier within the owning queue.
    pub id: MessageId,
    /// Delivery priority.
    pub priority: Priority,
    /// Opaque provider data.
    pub payload: P,
}

impl<P> QueuedMessageInfo<P> {
    /// Creates a new descriptor.
    pub fn new(id: MessageId, priority: Priority, payload: P) -> Self {
        Self {
            id,
            priority,
            payload,
        }
    }
}

// =============================================================================
// CLUSTER B: ORDERING
// =============================================================================

/// Five ordinal delivery levels, `VeryLow < Low < Normal < High < VeryHigh`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Priority {
    VeryLow = 0,
    Low = 1,
    #[default]
    Normal = 2,
    High = 3,
    VeryHigh = 4,
}

impl Priority {
    /// Number of distinct levels.
    pub const LEVELS: usize = 5;

    /// All levels, lowest first.
    pub const ALL: [Priority; Self::LEVELS] = [
        Priority::VeryLow,
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::VeryHigh,
    ];

    /// Zero-based ordinal, `VeryLow == 0`.
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Inverse of [`Priority::ordinal`].
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Canonical level name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryLow => "VeryLow",
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
            Self::VeryHigh => "VeryHigh",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Priority {
    type Error = PriorityError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(value as usize).ok_or(PriorityError::OrdinalOutOfRange(value))
    }
}

impl FromStr for Priority {
    type Err = PriorityError;

    /// Accepts `VeryHigh`, `very_high`, `very-high` and other case variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|p| p.as_str().to_lowercase() == normalized)
            .ok_or_else(|| PriorityError::UnknownLevel(s.to_string()))
    }
}

// =============================================================================
// CLUSTER C: UNITS OF WORK
// =============================================================================

/// Opaque handle identifying a transaction.
///
/// Two tokens are equal only if one was copied from the other: equality is
/// identity, never message content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionToken(Uuid);

impl TransactionToken {
    /// Issues a new token, distinct from every previously issued one.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Raw identifier, for logging and external correlation.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TransactionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx-{}", self.0.simple())
    }
}
