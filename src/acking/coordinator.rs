//! # Acking Coordinator
//!
//! Tracks, for every root tuple emitted by a spout, whether all of its
//! downstream derivative tuples were eventually fully processed, and
//! delivers exactly one success or replay outcome per root back to the
//! owning spout task.
//!
//! ## Concurrency
//!
//! Records live in a sharded map keyed by message id; open/anchor/ack/fail
//! are non-blocking and O(1) amortized, synchronized per record rather than
//! behind a global lock. Removal from the map is the single terminal commit
//! point: whichever caller removes the record (ack completion, explicit
//! fail, or the timeout sweep) delivers the outcome, so races between an
//! explicit fail and a concurrent sweep resolve to exactly one
//! notification and a second terminal signal is a tolerated no-op.

use crate::acking::record::RootRecord;
use crate::error::{Result, TopologyError};
use crate::hooks::{SpoutAckInfo, SpoutFailInfo, TaskHookDispatcher};
use crate::topology::{MessageId, TaskId};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Terminal disposition of a root tuple, delivered to the owning spout task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootOutcome {
    pub message_id: MessageId,
    pub kind: OutcomeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    /// Every tuple in the derivation tree was acked
    Acked { complete_latency_ms: u64 },
    /// A tuple in the tree failed, or the root timed out; replay expected
    Failed { fail_latency_ms: u64 },
}

/// Shared reliability coordinator for all spout and bolt tasks in a process
pub struct AckingCoordinator {
    records: DashMap<MessageId, RootRecord>,
    outcome_queues: DashMap<TaskId, mpsc::UnboundedSender<RootOutcome>>,
    dispatcher: Arc<TaskHookDispatcher>,
    message_timeout: Duration,
}

impl std::fmt::Debug for AckingCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AckingCoordinator")
            .field("pending_roots", &self.records.len())
            .field("message_timeout", &self.message_timeout)
            .finish()
    }
}

impl AckingCoordinator {
    /// Create a coordinator reporting state transitions through `dispatcher`
    pub fn new(message_timeout: Duration, dispatcher: Arc<TaskHookDispatcher>) -> Self {
        Self {
            records: DashMap::new(),
            outcome_queues: DashMap::new(),
            dispatcher,
            message_timeout,
        }
    }

    /// Register the outcome queue for a spout task.
    ///
    /// Each spout instance is single-threaded in its own loop, so outcomes
    /// are queued here and drained by the spout executor between
    /// `next_tuple` calls rather than invoked on the spout directly.
    pub fn register_spout(&self, spout_task: TaskId, outcomes: mpsc::UnboundedSender<RootOutcome>) {
        self.outcome_queues.insert(spout_task, outcomes);
    }

    /// Open a pending record for a freshly emitted root tuple.
    ///
    /// Fails with `DuplicateMessageId` if the id is already in flight; the
    /// caller must not have emitted anything for it yet.
    pub fn open_root(&self, spout_task: TaskId, message_id: MessageId) -> Result<()> {
        match self.records.entry(message_id) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                warn!(message_id = %entry.key(), "Rejected reuse of an in-flight message id");
                Err(TopologyError::duplicate_message_id(entry.key().clone()))
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                debug!(spout_task, message_id = %entry.key(), "Opened root");
                entry.insert(RootRecord::new(spout_task));
                Ok(())
            }
        }
    }

    /// Fold a newly emitted descendant tuple into its root's lineage.
    ///
    /// An unknown root is a tolerated race (the tree already closed, e.g.
    /// by the timeout sweep, while a stage was still emitting): logged and
    /// reported as `UnknownRoot`, never fatal.
    pub fn anchor(&self, root: &MessageId, tuple_id: u64) -> Result<()> {
        match self.records.get_mut(root) {
            Some(mut record) => {
                record.extend(tuple_id);
                Ok(())
            }
            None => {
                debug!(message_id = %root, tuple_id, "Anchor on a closed tree; ignoring");
                Err(TopologyError::unknown_root(root.clone()))
            }
        }
    }

    /// Retire a terminally acked tuple from its root's lineage.
    ///
    /// When the pending aggregate returns to neutral and no failure was
    /// recorded, the root closes as acked: the spout's success callback is
    /// queued and the `spout_ack` lifecycle event fires, exactly once.
    pub fn ack(&self, root: &MessageId, tuple_id: u64) {
        let maybe_complete = match self.records.get_mut(root) {
            Some(mut record) => {
                record.retire(tuple_id);
                record.is_complete()
            }
            None => {
                // Acks arriving after a fail or timeout closed the tree.
                debug!(message_id = %root, tuple_id, "Ack on a closed tree; ignoring");
                return;
            }
        };

        if maybe_complete {
            // Re-check under the entry lock: a concurrent anchor may have
            // reopened the lineage, and a concurrent closer may have won.
            if let Some((message_id, record)) =
                self.records.remove_if(root, |_, record| record.is_complete())
            {
                self.deliver_acked(message_id, &record);
            }
        }
    }

    /// Mark a root failed and queue its replay.
    ///
    /// Failure is sticky: the record is closed immediately without waiting
    /// for remaining tuples to settle, and later acks on surviving tuples
    /// in the tree become tolerated no-ops.
    pub fn fail(&self, root: &MessageId, tuple_id: u64) {
        match self.records.remove(root) {
            Some((message_id, record)) => {
                debug!(message_id = %message_id, tuple_id, "Root failed; queueing replay");
                self.deliver_failed(message_id, &record);
            }
            None => {
                debug!(message_id = %root, tuple_id, "Fail on a closed tree; ignoring");
            }
        }
    }

    /// Fail every open root older than the configured message timeout.
    ///
    /// Runs on a recurring schedule independent of ack/fail traffic so
    /// stalled trees are reclaimed even with no further signals. Safe to
    /// interleave with concurrent anchor/ack/fail calls on the same roots.
    /// Returns the number of roots reaped.
    pub fn sweep_timeouts(&self) -> usize {
        let timeout_ms = self.message_timeout.as_millis() as u64;
        let expired: Vec<MessageId> = self
            .records
            .iter()
            .filter(|entry| entry.value().age_ms() > timeout_ms)
            .map(|entry| entry.key().clone())
            .collect();

        let mut reaped = 0;
        for id in expired {
            // A concurrent ack or fail may close the root first; the
            // predicate re-check keeps the outcome single-delivery.
            if let Some((message_id, record)) =
                self.records.remove_if(&id, |_, record| record.age_ms() > timeout_ms)
            {
                debug!(message_id = %message_id, age_ms = record.age_ms(), "Root timed out; queueing replay");
                self.deliver_failed(message_id, &record);
                reaped += 1;
            }
        }
        reaped
    }

    /// Number of currently open roots, for the spout's pending-window check
    pub fn pending_count(&self) -> usize {
        self.records.len()
    }

    /// Whether a root is still open
    pub fn is_open(&self, root: &MessageId) -> bool {
        self.records.contains_key(root)
    }

    fn deliver_acked(&self, message_id: MessageId, record: &RootRecord) {
        let complete_latency_ms = record.age_ms();
        self.push_outcome(
            record.spout_task,
            RootOutcome {
                message_id: message_id.clone(),
                kind: OutcomeKind::Acked {
                    complete_latency_ms,
                },
            },
        );
        self.dispatcher.on_spout_ack(&SpoutAckInfo {
            message_id,
            spout_task_id: record.spout_task,
            complete_latency_ms,
        });
    }

    fn deliver_failed(&self, message_id: MessageId, record: &RootRecord) {
        let fail_latency_ms = record.age_ms();
        self.push_outcome(
            record.spout_task,
            RootOutcome {
                message_id: message_id.clone(),
                kind: OutcomeKind::Failed { fail_latency_ms },
            },
        );
        self.dispatcher.on_spout_fail(&SpoutFailInfo {
            message_id,
            spout_task_id: record.spout_task,
            fail_latency_ms,
        });
    }

    fn push_outcome(&self, spout_task: TaskId, outcome: RootOutcome) {
        match self.outcome_queues.get(&spout_task) {
            Some(queue) => {
                if queue.send(outcome).is_err() {
                    warn!(spout_task, "Spout outcome queue closed; dropping outcome");
                }
            }
            None => {
                warn!(spout_task, "No outcome queue registered for spout task");
            }
        }
    }
}
