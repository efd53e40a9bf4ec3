//! # Acking Protocol
//!
//! At-least-once delivery bookkeeping: one record per in-flight root
//! tuple, an XOR checksum over its derivation tree, and a timeout sweep
//! that replays stalled roots. See [`coordinator::AckingCoordinator`] for
//! the protocol contract.

pub mod coordinator;
mod record;

pub use coordinator::{AckingCoordinator, OutcomeKind, RootOutcome};
