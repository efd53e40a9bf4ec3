//! # Task Hooks
//!
//! Pluggable instrumentation layer observing every pipeline lifecycle event
//! without altering pipeline semantics. Any stage may register hooks with
//! the shared [`TaskHookDispatcher`] during its own `open`/`prepare`; the
//! dispatcher then invokes each hook synchronously for every emit, ack,
//! fail, execute, prepare, and cleanup event.
//!
//! ## Usage
//!
//! ```rust
//! use topology_core::hooks::{TaskHook, TaskHookDispatcher};
//! use topology_core::hooks::info::EmitInfo;
//! use topology_core::error::HookResult;
//! use topology_core::metrics::MetricsAggregator;
//! use std::sync::Arc;
//!
//! struct LoggingHook;
//!
//! impl TaskHook for LoggingHook {
//!     fn emit(&self, info: &EmitInfo) -> HookResult {
//!         println!("task {} emitted on stream {}", info.task_id, info.stream);
//!         Ok(())
//!     }
//! }
//!
//! let metrics = Arc::new(MetricsAggregator::new());
//! let dispatcher = TaskHookDispatcher::new(metrics);
//! dispatcher.register(Arc::new(LoggingHook));
//! ```

pub mod dispatcher;
pub mod info;

pub use dispatcher::TaskHookDispatcher;
pub use info::{BoltAckInfo, BoltExecuteInfo, BoltFailInfo, EmitInfo, SpoutAckInfo, SpoutFailInfo};

use crate::error::HookResult;
use crate::topology::TaskId;

/// Observer invoked synchronously on every lifecycle event.
///
/// Every method defaults to a no-op so implementations override only the
/// events they care about. Hooks may perform arbitrary side effects but
/// must tolerate at-least-once delivery: an event re-delivered after a
/// partial failure upstream reaches the hook again.
#[allow(unused_variables)]
pub trait TaskHook: Send + Sync {
    /// A task is starting up
    fn prepare(&self, task_id: TaskId) -> HookResult {
        Ok(())
    }

    /// A task is shutting down
    fn cleanup(&self, task_id: TaskId) -> HookResult {
        Ok(())
    }

    /// A stage emitted a tuple
    fn emit(&self, info: &EmitInfo) -> HookResult {
        Ok(())
    }

    /// A root tuple completed successfully
    fn spout_ack(&self, info: &SpoutAckInfo) -> HookResult {
        Ok(())
    }

    /// A root tuple failed and will be replayed
    fn spout_fail(&self, info: &SpoutFailInfo) -> HookResult {
        Ok(())
    }

    /// A bolt executed an input tuple
    fn bolt_execute(&self, info: &BoltExecuteInfo) -> HookResult {
        Ok(())
    }

    /// A bolt acked an input tuple
    fn bolt_ack(&self, info: &BoltAckInfo) -> HookResult {
        Ok(())
    }

    /// A bolt failed an input tuple
    fn bolt_fail(&self, info: &BoltFailInfo) -> HookResult {
        Ok(())
    }

    /// Name used in diagnostics when this hook fails
    fn hook_name(&self) -> &str {
        "unnamed_hook"
    }
}
