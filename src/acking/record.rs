//! Per-root lineage bookkeeping.

use crate::topology::TaskId;
use std::time::Instant;

/// Completion record for one in-flight root tuple.
///
/// `pending` is the XOR of every emitted-but-not-yet-terminal tuple id in
/// the root's derivation tree. Anchoring a tuple folds its id in; acking
/// folds it back out. The root is fully processed exactly when `pending`
/// returns to zero after having been non-zero at least once (`touched`).
#[derive(Debug)]
pub(crate) struct RootRecord {
    pub(crate) spout_task: TaskId,
    pub(crate) pending: u64,
    pub(crate) touched: bool,
    pub(crate) opened_at: Instant,
}

impl RootRecord {
    pub(crate) fn new(spout_task: TaskId) -> Self {
        Self {
            spout_task,
            pending: 0,
            touched: false,
            opened_at: Instant::now(),
        }
    }

    /// Fold a newly emitted descendant into the pending aggregate
    pub(crate) fn extend(&mut self, tuple_id: u64) {
        self.pending ^= tuple_id;
        self.touched = true;
    }

    /// Retire a terminally processed descendant from the pending aggregate
    pub(crate) fn retire(&mut self, tuple_id: u64) {
        self.pending ^= tuple_id;
    }

    /// Whether the whole derivation tree has settled
    pub(crate) fn is_complete(&self) -> bool {
        self.touched && self.pending == 0
    }

    /// Milliseconds since the root was opened
    pub(crate) fn age_ms(&self) -> u64 {
        self.opened_at.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_settles_after_extend_retire_pairs() {
        let mut record = RootRecord::new(1);
        assert!(!record.is_complete());

        record.extend(0xAB);
        record.extend(0xCD);
        assert!(!record.is_complete());

        record.retire(0xAB);
        assert!(!record.is_complete());

        record.retire(0xCD);
        assert!(record.is_complete());
    }

    #[test]
    fn test_neutral_record_is_not_complete() {
        // A record that never anchored anything must not read as complete.
        let record = RootRecord::new(1);
        assert_eq!(record.pending, 0);
        assert!(!record.is_complete());
    }
}
