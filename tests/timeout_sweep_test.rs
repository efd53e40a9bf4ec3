//! Timeout sweep tests: a stalled root produces the same observable
//! outcome as an explicit fail, and sweep races terminal signals safely.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use topology_core::acking::{AckingCoordinator, OutcomeKind, RootOutcome};
use topology_core::constants::hook_metrics;
use topology_core::hooks::TaskHookDispatcher;
use topology_core::metrics::MetricsAggregator;
use topology_core::MessageId;

const SPOUT_TASK: u32 = 1;

fn setup(
    timeout: Duration,
) -> (
    AckingCoordinator,
    mpsc::UnboundedReceiver<RootOutcome>,
    Arc<MetricsAggregator>,
) {
    let metrics = Arc::new(MetricsAggregator::new());
    let dispatcher = Arc::new(TaskHookDispatcher::new(metrics.clone()));
    let coordinator = AckingCoordinator::new(timeout, dispatcher);
    let (tx, rx) = mpsc::unbounded_channel();
    coordinator.register_spout(SPOUT_TASK, tx);
    (coordinator, rx, metrics)
}

#[test]
fn sweep_fails_expired_roots_like_an_explicit_fail() {
    let (coordinator, mut outcomes, metrics) = setup(Duration::from_millis(20));
    let root = MessageId::new("w2");

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    coordinator.anchor(&root, 0x11).unwrap();

    // Too young to reap.
    assert_eq!(coordinator.sweep_timeouts(), 0);
    assert!(coordinator.is_open(&root));

    std::thread::sleep(Duration::from_millis(40));
    assert_eq!(coordinator.sweep_timeouts(), 1);

    let outcome = outcomes.try_recv().unwrap();
    assert_eq!(outcome.message_id, root);
    assert!(matches!(outcome.kind, OutcomeKind::Failed { .. }));
    assert!(!coordinator.is_open(&root));
    assert_eq!(metrics.get(hook_metrics::HOOK_SPOUT_FAIL), Some(1));
}

#[test]
fn id_is_reusable_after_sweep() {
    let (coordinator, mut outcomes, _) = setup(Duration::from_millis(20));
    let root = MessageId::new("w2");

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    std::thread::sleep(Duration::from_millis(40));
    coordinator.sweep_timeouts();
    assert!(outcomes.try_recv().is_ok());

    // Replay path: the spout re-emits under the same id.
    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    assert!(coordinator.is_open(&root));
}

#[test]
fn sweep_after_explicit_fail_does_not_double_notify() {
    let (coordinator, mut outcomes, _) = setup(Duration::from_millis(20));
    let root = MessageId::new("w2");

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    coordinator.anchor(&root, 0x11).unwrap();
    std::thread::sleep(Duration::from_millis(40));

    coordinator.fail(&root, 0x11);
    assert_eq!(coordinator.sweep_timeouts(), 0);

    assert!(outcomes.try_recv().is_ok());
    assert!(outcomes.try_recv().is_err());
}

#[test]
fn sweep_leaves_fresh_roots_alone() {
    let (coordinator, mut outcomes, _) = setup(Duration::from_secs(30));
    for i in 0..10 {
        coordinator
            .open_root(SPOUT_TASK, MessageId::new(format!("w{i}")))
            .unwrap();
    }

    assert_eq!(coordinator.sweep_timeouts(), 0);
    assert_eq!(coordinator.pending_count(), 10);
    assert!(outcomes.try_recv().is_err());
}
