//! # Quantum-MQ Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Tracing setup and message builders
//! └── integration/
//!     ├── flows.rs      # Broker-level claim / finalize / abandon flows
//!     ├── concurrency.rs# Many workers against one queue
//!     └── properties.rs # proptest against a reference model
//!
//! tests/benches/
//! └── delivery_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p mq-tests
//!
//! # By category
//! cargo test -p mq-tests integration::concurrency::
//! cargo test -p mq-tests integration::properties::
//!
//! # Benchmarks
//! cargo bench -p mq-tests
//! ```

pub mod integration;
