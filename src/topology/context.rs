//! Per-task context handed to stages during startup.

use crate::hooks::{TaskHook, TaskHookDispatcher};
use crate::metrics::MetricsAggregator;
use crate::topology::TaskId;
use std::sync::Arc;
use tracing::info;

/// Context a spout or bolt receives in `open`/`prepare`.
///
/// The hook registration surface: any stage may add hooks here during its
/// own initialization. Registration is additive and process-lifetime; the
/// registry is shared read-only across all tasks afterwards.
#[derive(Clone)]
pub struct TaskContext {
    task_id: TaskId,
    dispatcher: Arc<TaskHookDispatcher>,
    metrics: Arc<MetricsAggregator>,
}

impl TaskContext {
    pub fn new(
        task_id: TaskId,
        dispatcher: Arc<TaskHookDispatcher>,
        metrics: Arc<MetricsAggregator>,
    ) -> Self {
        Self {
            task_id,
            dispatcher,
            metrics,
        }
    }

    /// Identifier of the task this context belongs to
    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Register a hook with the shared dispatcher
    pub fn add_task_hook(&self, hook: Arc<dyn TaskHook>) {
        info!(task_id = self.task_id, hook = hook.hook_name(), "Registering task hook");
        self.dispatcher.register(hook);
    }

    /// Shared metric counters
    pub fn metrics(&self) -> &Arc<MetricsAggregator> {
        &self.metrics
    }

    /// Shared hook dispatcher
    pub fn dispatcher(&self) -> &Arc<TaskHookDispatcher> {
        &self.dispatcher
    }
}
