//! Acking coordinator protocol tests: lineage settlement, sticky failure,
//! idempotent terminal signals, and tolerated races.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use topology_core::acking::{AckingCoordinator, OutcomeKind, RootOutcome};
use topology_core::constants::hook_metrics;
use topology_core::hooks::TaskHookDispatcher;
use topology_core::metrics::MetricsAggregator;
use topology_core::{MessageId, TopologyError};

const SPOUT_TASK: u32 = 1;

fn setup() -> (
    AckingCoordinator,
    mpsc::UnboundedReceiver<RootOutcome>,
    Arc<MetricsAggregator>,
) {
    let metrics = Arc::new(MetricsAggregator::new());
    let dispatcher = Arc::new(TaskHookDispatcher::new(metrics.clone()));
    let coordinator = AckingCoordinator::new(Duration::from_secs(30), dispatcher);
    let (tx, rx) = mpsc::unbounded_channel();
    coordinator.register_spout(SPOUT_TASK, tx);
    (coordinator, rx, metrics)
}

#[test]
fn multi_tuple_tree_acks_exactly_once() {
    let (coordinator, mut outcomes, metrics) = setup();
    let root = MessageId::new("w1");

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    coordinator.anchor(&root, 0x11).unwrap();
    coordinator.anchor(&root, 0x22).unwrap();
    coordinator.anchor(&root, 0x33).unwrap();

    coordinator.ack(&root, 0x22);
    coordinator.ack(&root, 0x11);
    assert!(coordinator.is_open(&root), "tree must stay open until every tuple retires");
    assert!(outcomes.try_recv().is_err());

    coordinator.ack(&root, 0x33);
    let outcome = outcomes.try_recv().unwrap();
    assert_eq!(outcome.message_id, root);
    assert!(matches!(outcome.kind, OutcomeKind::Acked { .. }));
    assert!(!coordinator.is_open(&root));
    assert_eq!(metrics.get(hook_metrics::HOOK_SPOUT_ACK), Some(1));

    // No second outcome for the same root.
    assert!(outcomes.try_recv().is_err());
}

#[test]
fn fail_wins_over_subsequent_acks() {
    let (coordinator, mut outcomes, metrics) = setup();
    let root = MessageId::new("w1");

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    coordinator.anchor(&root, 0x11).unwrap();
    coordinator.anchor(&root, 0x22).unwrap();

    coordinator.fail(&root, 0x11);
    let outcome = outcomes.try_recv().unwrap();
    assert!(matches!(outcome.kind, OutcomeKind::Failed { .. }));
    assert!(!coordinator.is_open(&root));
    assert_eq!(metrics.get(hook_metrics::HOOK_SPOUT_FAIL), Some(1));

    // Acks on surviving tuples retire bookkeeping without flipping the
    // outcome back to success.
    coordinator.ack(&root, 0x22);
    assert!(outcomes.try_recv().is_err());
    assert_eq!(metrics.get(hook_metrics::HOOK_SPOUT_ACK), None);
}

#[test]
fn second_terminal_signal_is_a_no_op() {
    let (coordinator, mut outcomes, _) = setup();
    let root = MessageId::new("w1");

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    coordinator.anchor(&root, 0x11).unwrap();

    coordinator.fail(&root, 0x11);
    coordinator.fail(&root, 0x11);

    assert!(outcomes.try_recv().is_ok());
    assert!(outcomes.try_recv().is_err(), "duplicate fail must not notify twice");
}

#[test]
fn duplicate_open_is_rejected_while_in_flight() {
    let (coordinator, _outcomes, _) = setup();
    let root = MessageId::new("w1");

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    let err = coordinator.open_root(SPOUT_TASK, root.clone()).unwrap_err();
    assert_eq!(
        err,
        TopologyError::DuplicateMessageId {
            message_id: root.clone()
        }
    );

    // The original record is untouched by the rejected open.
    assert!(coordinator.is_open(&root));
    assert_eq!(coordinator.pending_count(), 1);
}

#[test]
fn id_is_reusable_after_terminal_state() {
    let (coordinator, mut outcomes, _) = setup();
    let root = MessageId::new("w1");

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    coordinator.anchor(&root, 0x11).unwrap();
    coordinator.ack(&root, 0x11);
    assert!(outcomes.try_recv().is_ok());

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    assert!(coordinator.is_open(&root));
}

#[test]
fn signals_on_unknown_roots_are_tolerated() {
    let (coordinator, mut outcomes, _) = setup();
    let ghost = MessageId::new("never-opened");

    let err = coordinator.anchor(&ghost, 0x11).unwrap_err();
    assert!(matches!(err, TopologyError::UnknownRoot { .. }));

    coordinator.ack(&ghost, 0x11);
    coordinator.fail(&ghost, 0x11);

    assert!(outcomes.try_recv().is_err());
    assert_eq!(coordinator.pending_count(), 0);
}

#[test]
fn interleaved_anchor_and_ack_does_not_close_early() {
    let (coordinator, mut outcomes, _) = setup();
    let root = MessageId::new("w1");

    coordinator.open_root(SPOUT_TASK, root.clone()).unwrap();
    coordinator.anchor(&root, 0x11).unwrap();

    // A bolt emits a derived tuple before acking its input; retiring the
    // input must not settle the tree while the child is outstanding.
    coordinator.anchor(&root, 0x22).unwrap();
    coordinator.ack(&root, 0x11);
    assert!(coordinator.is_open(&root));
    assert!(outcomes.try_recv().is_err());

    coordinator.ack(&root, 0x22);
    assert!(matches!(
        outcomes.try_recv().unwrap().kind,
        OutcomeKind::Acked { .. }
    ));
}
