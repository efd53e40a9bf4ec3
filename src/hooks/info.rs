//! Immutable event-info value objects passed to task hooks.
//!
//! Each lifecycle event carries only the fields relevant to it: emitted
//! values and destinations for emits, latency and message id for spout
//! outcomes, latency and the input tuple for bolt events.

use crate::topology::{MessageId, TaskId, Tuple};
use serde_json::Value;

/// A stage emitted a tuple
#[derive(Debug, Clone)]
pub struct EmitInfo {
    pub values: Vec<Value>,
    pub task_id: TaskId,
    pub stream: String,
    pub out_tasks: Vec<TaskId>,
}

/// A root tuple's full lineage was acknowledged
#[derive(Debug, Clone)]
pub struct SpoutAckInfo {
    pub message_id: MessageId,
    pub spout_task_id: TaskId,
    pub complete_latency_ms: u64,
}

/// A root tuple failed (explicit fail or timeout) and will be replayed
#[derive(Debug, Clone)]
pub struct SpoutFailInfo {
    pub message_id: MessageId,
    pub spout_task_id: TaskId,
    pub fail_latency_ms: u64,
}

/// A bolt finished executing an input tuple
#[derive(Debug, Clone)]
pub struct BoltExecuteInfo {
    pub tuple: Tuple,
    pub executing_task_id: TaskId,
    pub execute_latency_ms: u64,
}

/// A bolt acked an input tuple
#[derive(Debug, Clone)]
pub struct BoltAckInfo {
    pub tuple: Tuple,
    pub acking_task_id: TaskId,
    pub process_latency_ms: u64,
}

/// A bolt failed an input tuple
#[derive(Debug, Clone)]
pub struct BoltFailInfo {
    pub tuple: Tuple,
    pub failing_task_id: TaskId,
    pub fail_latency_ms: u64,
}
