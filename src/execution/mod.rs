//! # Execution
//!
//! Worker loops and the local topology harness. Every spout and bolt
//! instance runs single-threaded in its own tokio task; the only state
//! shared across task boundaries is the acking coordinator's records and
//! the metric counters.

pub mod bolt_executor;
pub mod runner;
pub mod spout_executor;

pub use bolt_executor::BoltExecutor;
pub use runner::TopologyRunner;
pub use spout_executor::SpoutExecutor;
