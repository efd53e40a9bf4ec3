//! Output collectors: the emit/ack/fail surface handed to stages.
//!
//! Collectors are where the reliability protocol and the hook layer attach
//! to the data path: every emit anchors into the owning root's lineage and
//! fires `emit` hooks; every bolt ack/fail signals the coordinator and
//! fires the corresponding bolt hook.

use crate::acking::{AckingCoordinator, OutcomeKind, RootOutcome};
use crate::error::Result;
use crate::hooks::{BoltAckInfo, BoltFailInfo, EmitInfo, SpoutAckInfo, TaskHookDispatcher};
use crate::topology::transport::TupleTransport;
use crate::topology::tuple::{fresh_tuple_id, MessageId, TaskId, Tuple};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::warn;

/// Emit surface for a spout task.
///
/// A tagged emit (with a `MessageId`) opens a pending root and anchors the
/// emitted tuple into it; the spout will later observe exactly one ack or
/// fail callback for that id. An untagged emit is untracked. With acking
/// disabled the coordinator is bypassed and every tagged emit is reported
/// back as an immediate success.
pub struct SpoutOutputCollector {
    task_id: TaskId,
    stream: String,
    acking_enabled: bool,
    coordinator: Arc<AckingCoordinator>,
    dispatcher: Arc<TaskHookDispatcher>,
    transport: Arc<dyn TupleTransport>,
    outcomes: mpsc::UnboundedSender<RootOutcome>,
    emitted: u64,
}

impl SpoutOutputCollector {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        task_id: TaskId,
        stream: String,
        acking_enabled: bool,
        coordinator: Arc<AckingCoordinator>,
        dispatcher: Arc<TaskHookDispatcher>,
        transport: Arc<dyn TupleTransport>,
        outcomes: mpsc::UnboundedSender<RootOutcome>,
    ) -> Self {
        Self {
            task_id,
            stream,
            acking_enabled,
            coordinator,
            dispatcher,
            transport,
            outcomes,
            emitted: 0,
        }
    }

    /// Total tuples emitted through this collector; the executor uses it to
    /// detect an idle poll and back off instead of spinning.
    pub(crate) fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Emit a tuple, optionally tagged with a root message id.
    ///
    /// Returns the fresh tuple id, or `DuplicateMessageId` if the tag is
    /// already in flight (nothing is emitted in that case).
    pub fn emit(&mut self, values: Vec<Value>, message_id: Option<MessageId>) -> Result<u64> {
        let tuple_id = fresh_tuple_id();
        let mut root = None;

        if let Some(id) = message_id {
            if self.acking_enabled {
                self.coordinator.open_root(self.task_id, id.clone())?;
                // The emitted tuple is the root's first descendant.
                let _ = self.coordinator.anchor(&id, tuple_id);
                root = Some(id);
            } else {
                self.report_immediate_success(id);
            }
        }

        let tuple = Tuple {
            values: values.clone(),
            stream: self.stream.clone(),
            source_task: self.task_id,
            tuple_id,
            root,
        };
        let out_tasks = self.transport.send(tuple)?;
        self.emitted += 1;

        self.dispatcher.on_emit(&EmitInfo {
            values,
            task_id: self.task_id,
            stream: self.stream.clone(),
            out_tasks,
        });
        Ok(tuple_id)
    }

    // Acking disabled: the tuple is treated as immediately successful, and
    // spout_ack hook events still fire (latency zero) so hook-side
    // accounting matches the callbacks the spout observes.
    fn report_immediate_success(&self, message_id: MessageId) {
        let outcome = RootOutcome {
            message_id: message_id.clone(),
            kind: OutcomeKind::Acked {
                complete_latency_ms: 0,
            },
        };
        if self.outcomes.send(outcome).is_err() {
            warn!(task_id = self.task_id, "Spout outcome queue closed");
        }
        self.dispatcher.on_spout_ack(&SpoutAckInfo {
            message_id,
            spout_task_id: self.task_id,
            complete_latency_ms: 0,
        });
    }
}

/// Emit/ack/fail surface for a bolt task.
///
/// `execute` must eventually call exactly one of `ack` or `fail` for every
/// input tuple; taking no action leaves the owning root to the timeout
/// sweep. Anchored emits must happen before the terminal ack so the
/// lineage never transiently settles.
pub struct OutputCollector {
    task_id: TaskId,
    stream: String,
    coordinator: Arc<AckingCoordinator>,
    dispatcher: Arc<TaskHookDispatcher>,
    transport: Arc<dyn TupleTransport>,
    input_received_at: Option<Instant>,
}

impl OutputCollector {
    pub(crate) fn new(
        task_id: TaskId,
        stream: String,
        coordinator: Arc<AckingCoordinator>,
        dispatcher: Arc<TaskHookDispatcher>,
        transport: Arc<dyn TupleTransport>,
    ) -> Self {
        Self {
            task_id,
            stream,
            coordinator,
            dispatcher,
            transport,
            input_received_at: None,
        }
    }

    /// Mark the arrival time of the input tuple about to be executed;
    /// ack/fail latencies are measured from here.
    pub(crate) fn begin_input(&mut self, at: Instant) {
        self.input_received_at = Some(at);
    }

    fn process_latency_ms(&self) -> u64 {
        self.input_received_at
            .map(|at| at.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    /// Emit a derived tuple, extending the lineage of the anchor's root.
    ///
    /// Anchoring onto an already-closed tree is a tolerated no-op; the
    /// emitted tuple still flows, its acks simply land on a closed root.
    pub fn emit(&mut self, values: Vec<Value>, anchor: Option<&Tuple>) -> Result<u64> {
        let tuple_id = fresh_tuple_id();
        let root = anchor.and_then(|tuple| tuple.root.clone());
        if let Some(root_id) = &root {
            let _ = self.coordinator.anchor(root_id, tuple_id);
        }

        let tuple = Tuple {
            values: values.clone(),
            stream: self.stream.clone(),
            source_task: self.task_id,
            tuple_id,
            root,
        };
        let out_tasks = self.transport.send(tuple)?;

        self.dispatcher.on_emit(&EmitInfo {
            values,
            task_id: self.task_id,
            stream: self.stream.clone(),
            out_tasks,
        });
        Ok(tuple_id)
    }

    /// Terminally acknowledge an input tuple
    pub fn ack(&mut self, tuple: &Tuple) {
        if let Some(root) = &tuple.root {
            self.coordinator.ack(root, tuple.tuple_id);
        }
        self.dispatcher.on_bolt_ack(&BoltAckInfo {
            tuple: tuple.clone(),
            acking_task_id: self.task_id,
            process_latency_ms: self.process_latency_ms(),
        });
    }

    /// Terminally fail an input tuple, triggering replay of its root
    pub fn fail(&mut self, tuple: &Tuple) {
        if let Some(root) = &tuple.root {
            self.coordinator.fail(root, tuple.tuple_id);
        }
        self.dispatcher.on_bolt_fail(&BoltFailInfo {
            tuple: tuple.clone(),
            failing_task_id: self.task_id,
            fail_latency_ms: self.process_latency_ms(),
        });
    }
}
