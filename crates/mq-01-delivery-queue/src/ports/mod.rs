//! Ports layer for the Delivery Queue subsystem.
//!
//! Inbound (driving) port exposed to the broker. Outbound notifications go
//! through `adapters::publisher`.

pub mod inbound;

pub use inbound::*;
