//! Spout and bolt execution contracts.

use crate::config::TopologyConfig;
use crate::topology::collector::{OutputCollector, SpoutOutputCollector};
use crate::topology::context::TaskContext;
use crate::topology::tuple::{MessageId, Tuple};
use async_trait::async_trait;

/// Source stage of the pipeline.
///
/// Each instance runs single-threaded in its own loop: `next_tuple` is
/// polled while the pending window has room, and `ack`/`fail` callbacks are
/// delivered between polls. A correct `fail` implementation re-emits the
/// original payload (replay); the reliability core guarantees each callback
/// fires exactly once per root id.
#[async_trait]
pub trait Spout: Send {
    /// Called once before the first `next_tuple`; register hooks here
    async fn open(&mut self, config: &TopologyConfig, context: &TaskContext);

    /// Emit zero or one tuple, tagging roots with a fresh message id
    async fn next_tuple(&mut self, collector: &mut SpoutOutputCollector);

    /// Success callback: every tuple derived from this root was processed
    async fn ack(&mut self, _message_id: &MessageId) {}

    /// Failure/replay callback: the root failed or timed out
    async fn fail(&mut self, _message_id: &MessageId) {}

    /// Called once on shutdown
    async fn close(&mut self) {}
}

/// Processing stage of the pipeline.
///
/// `execute` must, for every input tuple, eventually call exactly one of
/// `ack` or `fail` on the collector, or take no action, which leaves the
/// owning root to an eventual timeout-driven fail.
#[async_trait]
pub trait Bolt: Send {
    /// Called once before the first `execute`; register hooks here
    async fn prepare(&mut self, config: &TopologyConfig, context: &TaskContext);

    /// Process one input tuple, optionally emitting derived tuples
    async fn execute(&mut self, tuple: Tuple, collector: &mut OutputCollector);

    /// Called once on shutdown
    async fn cleanup(&mut self) {}
}
