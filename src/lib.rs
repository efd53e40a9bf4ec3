#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Topology Core
//!
//! High-performance Rust core for reliable stream topology processing:
//! at-least-once tuple delivery for spout/bolt pipelines, plus a pluggable
//! instrumentation layer observing every lifecycle event.
//!
//! ## Overview
//!
//! A spout emits root tuples tagged with unique message ids; bolts consume
//! tuples, optionally emit derived tuples extending the root's lineage, and
//! terminally ack or fail each input. The acking coordinator tracks each
//! root's derivation tree through an XOR checksum and notifies the owning
//! spout exactly once per root: success when the whole tree settles,
//! failure (replay) on any fail signal or timeout. Every emit, ack, fail,
//! execute, prepare, and cleanup event fans out synchronously to the
//! registered task hooks and increments a process-wide metric counter.
//!
//! ## Module Organization
//!
//! - [`acking`] - Per-root lineage records, the acking coordinator, and the
//!   timeout sweep
//! - [`hooks`] - Task hook capability trait, event-info shapes, and the
//!   dispatcher
//! - [`metrics`] - Process-wide lock-free counters
//! - [`topology`] - Tuples, message ids, spout/bolt contracts, collectors,
//!   and the transport boundary
//! - [`execution`] - Worker loops and the local topology runner
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Structured error handling
//! - [`test_helpers`] - Demo stages and hooks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use topology_core::config::TopologyConfig;
//! use topology_core::execution::TopologyRunner;
//! use topology_core::test_helpers::{AckPolicy, CountBolt, WordSpout};
//!
//! #[tokio::main]
//! async fn main() {
//!     topology_core::logging::init_logging();
//!
//!     let mut runner = TopologyRunner::new(TopologyConfig::default());
//!     runner.add_bolt(CountBolt::new(AckPolicy::AckAll));
//!     runner.add_spout(WordSpout::with_limit(1000));
//!     // ... let the pipeline drain, then:
//!     runner.shutdown().await;
//! }
//! ```
//!
//! ## Guarantees
//!
//! At-least-once only: a failed or timed-out root is replayed by its spout,
//! so downstream stages may observe a tuple more than once. Exactly-once
//! semantics, cross-process transport reliability, and persistence of
//! in-flight state across restarts are out of scope.

pub mod acking;
pub mod config;
pub mod constants;
pub mod error;
pub mod execution;
pub mod hooks;
pub mod logging;
pub mod metrics;
pub mod test_helpers;
pub mod topology;

pub use acking::{AckingCoordinator, OutcomeKind, RootOutcome};
pub use config::{ReliabilityConfig, TopologyConfig, WorkerConfig};
pub use error::{HookError, HookResult, Result, TopologyError};
pub use execution::{BoltExecutor, SpoutExecutor, TopologyRunner};
pub use hooks::{TaskHook, TaskHookDispatcher};
pub use metrics::MetricsAggregator;
pub use topology::{
    Bolt, ChannelTransport, MessageId, OutputCollector, Spout, SpoutOutputCollector, TaskContext,
    TaskId, Tuple, TupleTransport,
};
