//! # Metrics Aggregator
//!
//! Process-wide named counters incremented by every event producer in the
//! pipeline. Counters are created at zero on first use, only ever move
//! forward, and reset only on process restart. An external reporting
//! collaborator reads them through [`MetricsAggregator::snapshot`].
//!
//! Increments are linearizable per counter: the map is sharded (dashmap)
//! and each counter is a lock-free atomic, so concurrent increments from
//! many stages never lose updates and never contend on a global lock.

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counter registry keyed by metric name
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    counters: DashMap<String, AtomicU64>,
}

impl MetricsAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically add one to the named counter, creating it at zero first
    /// if it has never been incremented.
    pub fn increment(&self, name: &str) {
        // Fast path avoids allocating the key when the counter exists.
        if let Some(counter) = self.counters.get(name) {
            counter.fetch_add(1, Ordering::Relaxed);
            return;
        }
        self.counters
            .entry(name.to_string())
            .or_default()
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Current value of a counter, `None` if it was never incremented
    pub fn get(&self, name: &str) -> Option<u64> {
        self.counters
            .get(name)
            .map(|counter| counter.load(Ordering::Relaxed))
    }

    /// Point-in-time copy of every counter for external reporting
    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counters
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
            .collect()
    }

    /// Number of distinct counters registered so far
    pub fn counter_count(&self) -> usize {
        self.counters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_created_at_zero_on_first_use() {
        let metrics = MetricsAggregator::new();
        assert_eq!(metrics.get("tuples_emitted"), None);

        metrics.increment("tuples_emitted");
        assert_eq!(metrics.get("tuples_emitted"), Some(1));

        metrics.increment("tuples_emitted");
        metrics.increment("tuples_emitted");
        assert_eq!(metrics.get("tuples_emitted"), Some(3));
    }

    #[test]
    fn test_snapshot_contains_all_counters() {
        let metrics = MetricsAggregator::new();
        metrics.increment("a");
        metrics.increment("b");
        metrics.increment("b");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.get("a"), Some(&1));
        assert_eq!(snapshot.get("b"), Some(&2));
        assert_eq!(metrics.counter_count(), 2);
    }
}
