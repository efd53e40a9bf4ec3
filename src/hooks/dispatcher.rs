//! # Task Hook Dispatcher
//!
//! Holds the ordered set of registered hooks and fans every lifecycle event
//! out to each of them, in registration order, synchronously with the event.
//!
//! Isolation contract: a hook that returns an error must not abort dispatch
//! to subsequent hooks or to the pipeline itself. Failures surface only as
//! an error-level diagnostic. Dispatch rides on the tuple-acking guarantee,
//! so hooks are invoked at least once per event, not exactly once.

use crate::constants::hook_metrics;
use crate::hooks::info::{
    BoltAckInfo, BoltExecuteInfo, BoltFailInfo, EmitInfo, SpoutAckInfo, SpoutFailInfo,
};
use crate::hooks::TaskHook;
use crate::metrics::MetricsAggregator;
use crate::topology::TaskId;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::error;

/// Ordered hook registry and per-event dispatch fan-out.
///
/// Registration happens during stage startup (`open`/`prepare`) and is
/// additive for the lifetime of the process; there is no deregistration.
/// After startup the list is read-mostly, so a sync RwLock keeps the hot
/// dispatch path lock-cheap.
pub struct TaskHookDispatcher {
    hooks: RwLock<Vec<Arc<dyn TaskHook>>>,
    metrics: Arc<MetricsAggregator>,
}

impl std::fmt::Debug for TaskHookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHookDispatcher")
            .field("hook_count", &self.hooks.read().len())
            .finish()
    }
}

impl TaskHookDispatcher {
    /// Create a dispatcher incrementing counters on the given aggregator
    pub fn new(metrics: Arc<MetricsAggregator>) -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
            metrics,
        }
    }

    /// Append a hook to the registration order
    pub fn register(&self, hook: Arc<dyn TaskHook>) {
        self.hooks.write().push(hook);
    }

    /// Number of registered hooks
    pub fn hook_count(&self) -> usize {
        self.hooks.read().len()
    }

    /// Dispatch a task `prepare` event
    pub fn on_prepare(&self, task_id: TaskId) {
        self.metrics.increment(hook_metrics::HOOK_PREPARE);
        for hook in self.hooks.read().iter() {
            if let Err(e) = hook.prepare(task_id) {
                self.log_hook_failure(hook.hook_name(), "prepare", &e);
            }
        }
    }

    /// Dispatch a task `cleanup` event
    pub fn on_cleanup(&self, task_id: TaskId) {
        self.metrics.increment(hook_metrics::HOOK_CLEANUP);
        for hook in self.hooks.read().iter() {
            if let Err(e) = hook.cleanup(task_id) {
                self.log_hook_failure(hook.hook_name(), "cleanup", &e);
            }
        }
    }

    /// Dispatch an `emit` event
    pub fn on_emit(&self, info: &EmitInfo) {
        self.metrics.increment(hook_metrics::HOOK_EMIT);
        for hook in self.hooks.read().iter() {
            if let Err(e) = hook.emit(info) {
                self.log_hook_failure(hook.hook_name(), "emit", &e);
            }
        }
    }

    /// Dispatch a `spout_ack` event
    pub fn on_spout_ack(&self, info: &SpoutAckInfo) {
        self.metrics.increment(hook_metrics::HOOK_SPOUT_ACK);
        for hook in self.hooks.read().iter() {
            if let Err(e) = hook.spout_ack(info) {
                self.log_hook_failure(hook.hook_name(), "spout_ack", &e);
            }
        }
    }

    /// Dispatch a `spout_fail` event
    pub fn on_spout_fail(&self, info: &SpoutFailInfo) {
        self.metrics.increment(hook_metrics::HOOK_SPOUT_FAIL);
        for hook in self.hooks.read().iter() {
            if let Err(e) = hook.spout_fail(info) {
                self.log_hook_failure(hook.hook_name(), "spout_fail", &e);
            }
        }
    }

    /// Dispatch a `bolt_execute` event
    pub fn on_bolt_execute(&self, info: &BoltExecuteInfo) {
        self.metrics.increment(hook_metrics::HOOK_BOLT_EXECUTE);
        for hook in self.hooks.read().iter() {
            if let Err(e) = hook.bolt_execute(info) {
                self.log_hook_failure(hook.hook_name(), "bolt_execute", &e);
            }
        }
    }

    /// Dispatch a `bolt_ack` event
    pub fn on_bolt_ack(&self, info: &BoltAckInfo) {
        self.metrics.increment(hook_metrics::HOOK_BOLT_ACK);
        for hook in self.hooks.read().iter() {
            if let Err(e) = hook.bolt_ack(info) {
                self.log_hook_failure(hook.hook_name(), "bolt_ack", &e);
            }
        }
    }

    /// Dispatch a `bolt_fail` event
    pub fn on_bolt_fail(&self, info: &BoltFailInfo) {
        self.metrics.increment(hook_metrics::HOOK_BOLT_FAIL);
        for hook in self.hooks.read().iter() {
            if let Err(e) = hook.bolt_fail(info) {
                self.log_hook_failure(hook.hook_name(), "bolt_fail", &e);
            }
        }
    }

    fn log_hook_failure(&self, hook: &str, event: &str, err: &crate::error::HookError) {
        error!(
            hook = hook,
            event = event,
            error = %err,
            "Task hook failed; continuing dispatch"
        );
    }
}
