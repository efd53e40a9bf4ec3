//! # Test Helpers
//!
//! Reusable demo stages and hooks for exercising the reliability core:
//! a word spout that replays failed roots, a counting bolt with pluggable
//! acknowledgment policies (including the deliberately-unacked policy that
//! exercises the timeout path), and recording/failing hooks.
//!
//! These are demo/test policies, not pipeline invariants.

use crate::error::{HookError, HookResult};
use crate::hooks::{
    BoltAckInfo, BoltExecuteInfo, BoltFailInfo, EmitInfo, SpoutAckInfo, SpoutFailInfo, TaskHook,
};
use crate::config::TopologyConfig;
use crate::topology::{
    Bolt, MessageId, OutputCollector, Spout, SpoutOutputCollector, TaskContext, TaskId, Tuple,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

const WORDS: [&str; 5] = ["nathan", "mike", "jackson", "golda", "bertels"];

/// Shared record of the outcomes a [`WordSpout`] observed
#[derive(Debug, Default)]
pub struct SpoutLedger {
    acked: Mutex<Vec<MessageId>>,
    failed: Mutex<Vec<MessageId>>,
}

impl SpoutLedger {
    pub fn acked(&self) -> Vec<MessageId> {
        self.acked.lock().clone()
    }

    pub fn failed(&self) -> Vec<MessageId> {
        self.failed.lock().clone()
    }

    pub fn acked_count(&self) -> usize {
        self.acked.lock().len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.lock().len()
    }
}

/// Spout emitting words tagged with fresh message ids.
///
/// Keeps the original payload of every in-flight root so the replay
/// callback can re-emit it, and records every ack/fail outcome in a shared
/// ledger for test assertions.
pub struct WordSpout {
    next_seq: usize,
    limit: Option<usize>,
    replay_on_fail: bool,
    in_flight: HashMap<MessageId, String>,
    replay_queue: VecDeque<MessageId>,
    hook: Option<Arc<dyn TaskHook>>,
    ledger: Arc<SpoutLedger>,
}

impl WordSpout {
    /// Spout that emits forever
    pub fn new() -> Self {
        Self {
            next_seq: 0,
            limit: None,
            replay_on_fail: true,
            in_flight: HashMap::new(),
            replay_queue: VecDeque::new(),
            hook: None,
            ledger: Arc::new(SpoutLedger::default()),
        }
    }

    /// Spout that stops tagging new roots after `limit` emits
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Register a hook during `open`, the way a real stage would
    pub fn with_task_hook(mut self, hook: Arc<dyn TaskHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Record failures without re-emitting the payload
    pub fn without_replay(mut self) -> Self {
        self.replay_on_fail = false;
        self
    }

    /// Handle for inspecting outcomes after the spout moved into its executor
    pub fn ledger(&self) -> Arc<SpoutLedger> {
        self.ledger.clone()
    }
}

impl Default for WordSpout {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Spout for WordSpout {
    async fn open(&mut self, _config: &TopologyConfig, context: &TaskContext) {
        if let Some(hook) = self.hook.take() {
            context.add_task_hook(hook);
        }
    }

    async fn next_tuple(&mut self, collector: &mut SpoutOutputCollector) {
        // Replays take priority over fresh emits.
        if let Some(message_id) = self.replay_queue.pop_front() {
            if let Some(word) = self.in_flight.get(&message_id).cloned() {
                if collector.emit(vec![json!(word)], Some(message_id.clone())).is_err() {
                    // Root still open somewhere; try again next poll.
                    self.replay_queue.push_front(message_id);
                }
            }
            return;
        }

        if let Some(limit) = self.limit {
            if self.next_seq >= limit {
                return;
            }
        }

        let word = WORDS[self.next_seq % WORDS.len()].to_string();
        let message_id = MessageId::new(format!("{word}-{}", self.next_seq));
        if collector
            .emit(vec![json!(word.clone())], Some(message_id.clone()))
            .is_ok()
        {
            self.in_flight.insert(message_id, word);
            self.next_seq += 1;
        }
    }

    async fn ack(&mut self, message_id: &MessageId) {
        self.in_flight.remove(message_id);
        self.ledger.acked.lock().push(message_id.clone());
    }

    async fn fail(&mut self, message_id: &MessageId) {
        self.ledger.failed.lock().push(message_id.clone());
        if self.replay_on_fail {
            self.replay_queue.push_back(message_id.clone());
        } else {
            self.in_flight.remove(message_id);
        }
    }
}

/// Acknowledgment policy for [`CountBolt`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckPolicy {
    /// Ack every input
    AckAll,
    /// Fail every nth input, ack the rest
    FailEveryNth(u64),
    /// Deliberately neither ack nor fail every nth input, leaving its root
    /// to the timeout sweep
    SkipEveryNth(u64),
}

/// Bolt counting words, acking per its policy
pub struct CountBolt {
    policy: AckPolicy,
    seen: u64,
    counts: HashMap<String, u64>,
    executed: Arc<AtomicU64>,
}

impl CountBolt {
    pub fn new(policy: AckPolicy) -> Self {
        Self {
            policy,
            seen: 0,
            counts: HashMap::new(),
            executed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle for the number of tuples executed so far
    pub fn executed_handle(&self) -> Arc<AtomicU64> {
        self.executed.clone()
    }
}

#[async_trait]
impl Bolt for CountBolt {
    async fn prepare(&mut self, _config: &TopologyConfig, _context: &TaskContext) {}

    async fn execute(&mut self, tuple: Tuple, collector: &mut OutputCollector) {
        self.seen += 1;
        self.executed.fetch_add(1, Ordering::Relaxed);

        if let Some(word) = tuple.first_value().and_then(|value| value.as_str()) {
            *self.counts.entry(word.to_string()).or_insert(0) += 1;
        }

        match self.policy {
            AckPolicy::AckAll => collector.ack(&tuple),
            AckPolicy::FailEveryNth(n) if self.seen % n == 0 => collector.fail(&tuple),
            AckPolicy::FailEveryNth(_) => collector.ack(&tuple),
            AckPolicy::SkipEveryNth(n) if self.seen % n == 0 => {
                debug!(tuple_id = tuple.tuple_id, "Deliberately leaving tuple unacknowledged");
            }
            AckPolicy::SkipEveryNth(_) => collector.ack(&tuple),
        }
    }
}

/// Hook counting every lifecycle event it observes
#[derive(Debug, Default)]
pub struct CountingHook {
    pub prepared: AtomicU64,
    pub cleaned: AtomicU64,
    pub emitted: AtomicU64,
    pub spout_acked: AtomicU64,
    pub spout_failed: AtomicU64,
    pub bolt_executed: AtomicU64,
    pub bolt_acked: AtomicU64,
    pub bolt_failed: AtomicU64,
}

impl CountingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}

impl TaskHook for CountingHook {
    fn prepare(&self, _task_id: TaskId) -> HookResult {
        self.prepared.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn cleanup(&self, _task_id: TaskId) -> HookResult {
        self.cleaned.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn emit(&self, _info: &EmitInfo) -> HookResult {
        self.emitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn spout_ack(&self, _info: &SpoutAckInfo) -> HookResult {
        self.spout_acked.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn spout_fail(&self, _info: &SpoutFailInfo) -> HookResult {
        self.spout_failed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn bolt_execute(&self, _info: &BoltExecuteInfo) -> HookResult {
        self.bolt_executed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn bolt_ack(&self, _info: &BoltAckInfo) -> HookResult {
        self.bolt_acked.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn bolt_fail(&self, _info: &BoltFailInfo) -> HookResult {
        self.bolt_failed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn hook_name(&self) -> &str {
        "counting_hook"
    }
}

/// Hook that errors on every event, for exercising dispatch isolation
#[derive(Debug, Default)]
pub struct FailingHook;

impl FailingHook {
    fn boom(event: &str) -> HookError {
        format!("failing_hook refuses {event}").into()
    }
}

impl TaskHook for FailingHook {
    fn prepare(&self, _task_id: TaskId) -> HookResult {
        Err(Self::boom("prepare"))
    }

    fn cleanup(&self, _task_id: TaskId) -> HookResult {
        Err(Self::boom("cleanup"))
    }

    fn emit(&self, _info: &EmitInfo) -> HookResult {
        Err(Self::boom("emit"))
    }

    fn spout_ack(&self, _info: &SpoutAckInfo) -> HookResult {
        Err(Self::boom("spout_ack"))
    }

    fn spout_fail(&self, _info: &SpoutFailInfo) -> HookResult {
        Err(Self::boom("spout_fail"))
    }

    fn bolt_execute(&self, _info: &BoltExecuteInfo) -> HookResult {
        Err(Self::boom("bolt_execute"))
    }

    fn bolt_ack(&self, _info: &BoltAckInfo) -> HookResult {
        Err(Self::boom("bolt_ack"))
    }

    fn bolt_fail(&self, _info: &BoltFailInfo) -> HookResult {
        Err(Self::boom("bolt_fail"))
    }

    fn hook_name(&self) -> &str {
        "failing_hook"
    }
}
