//! Tuple transport boundary.
//!
//! Wire serialization, network transport between distributed workers, and
//! placement are external collaborators; the core only needs "emit a tuple
//! to destination(s)". [`ChannelTransport`] is the in-process implementation
//! the executors and tests wire up.

use crate::error::{Result, TopologyError};
use crate::topology::tuple::{TaskId, Tuple};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::debug;

/// Abstract "emit a tuple to destination(s)" operation.
///
/// `send` must be non-blocking; it returns the task ids the tuple was
/// routed to so emit hooks can report destinations.
pub trait TupleTransport: Send + Sync {
    fn send(&self, tuple: Tuple) -> Result<Vec<TaskId>>;
}

/// In-process transport routing tuples over unbounded mpsc channels,
/// round-robin across the registered consumer tasks (shuffle grouping).
#[derive(Default)]
pub struct ChannelTransport {
    inboxes: DashMap<TaskId, mpsc::UnboundedSender<Tuple>>,
    consumers: parking_lot::RwLock<Vec<TaskId>>,
    next: AtomicUsize,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a consumer task, returning the receiving end of its inbox
    pub fn register_consumer(&self, task_id: TaskId) -> mpsc::UnboundedReceiver<Tuple> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inboxes.insert(task_id, tx);
        self.consumers.write().push(task_id);
        rx
    }

    /// Number of registered consumers
    pub fn consumer_count(&self) -> usize {
        self.consumers.read().len()
    }
}

impl TupleTransport for ChannelTransport {
    fn send(&self, tuple: Tuple) -> Result<Vec<TaskId>> {
        let dest = {
            let consumers = self.consumers.read();
            if consumers.is_empty() {
                debug!(
                    stream = %tuple.stream,
                    source_task = tuple.source_task,
                    "No consumers registered; dropping tuple"
                );
                return Ok(Vec::new());
            }
            let index = self.next.fetch_add(1, Ordering::Relaxed) % consumers.len();
            consumers[index]
        };

        let sender = self.inboxes.get(&dest).ok_or_else(|| {
            TopologyError::transport(format!("no inbox registered for task {dest}"))
        })?;
        sender
            .send(tuple)
            .map_err(|_| TopologyError::transport(format!("inbox for task {dest} is closed")))?;
        Ok(vec![dest])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn word_tuple(word: &str) -> Tuple {
        Tuple {
            values: vec![json!(word)],
            stream: crate::constants::DEFAULT_STREAM.to_string(),
            source_task: 1,
            tuple_id: 42,
            root: None,
        }
    }

    #[tokio::test]
    async fn test_round_robin_routing() {
        let transport = ChannelTransport::new();
        let mut rx_a = transport.register_consumer(10);
        let mut rx_b = transport.register_consumer(11);

        assert_eq!(transport.send(word_tuple("one")).unwrap(), vec![10]);
        assert_eq!(transport.send(word_tuple("two")).unwrap(), vec![11]);
        assert_eq!(transport.send(word_tuple("three")).unwrap(), vec![10]);

        assert_eq!(rx_a.recv().await.unwrap().first_value(), Some(&json!("one")));
        assert_eq!(rx_b.recv().await.unwrap().first_value(), Some(&json!("two")));
        assert_eq!(
            rx_a.recv().await.unwrap().first_value(),
            Some(&json!("three"))
        );
    }

    #[test]
    fn test_send_without_consumers_drops_tuple() {
        let transport = ChannelTransport::new();
        assert!(transport.send(word_tuple("lost")).unwrap().is_empty());
    }
}
