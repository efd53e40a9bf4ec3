//! Tuple and identifier types shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Identifier of one spout or bolt task instance within the process
pub type TaskId = u32;

/// Opaque, application-supplied identifier for a root tuple.
///
/// Must be unique among currently in-flight roots; once the root reaches a
/// terminal state (acked, failed, or timed out) the id may be reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One unit of data flowing through the topology.
///
/// `tuple_id` is the random identifier folded into the owning root's lineage
/// checksum; `root` names that owner and is `None` for untracked tuples
/// (untagged emits, or any emit while acking is disabled).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuple {
    pub values: Vec<Value>,
    pub stream: String,
    pub source_task: TaskId,
    pub tuple_id: u64,
    pub root: Option<MessageId>,
}

impl Tuple {
    /// First value of the tuple, if any
    pub fn first_value(&self) -> Option<&Value> {
        self.values.first()
    }
}

/// Generate a fresh random tuple id.
///
/// Zero is the XOR-checksum identity, so a zero id would vanish from the
/// lineage bookkeeping; regenerate on the (vanishingly rare) collision.
pub(crate) fn fresh_tuple_id() -> u64 {
    loop {
        let (hi, lo) = Uuid::new_v4().as_u64_pair();
        let id = hi ^ lo;
        if id != 0 {
            return id;
        }
    }
}
