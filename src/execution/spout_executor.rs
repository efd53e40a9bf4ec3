//! Spout worker loop.

use crate::acking::{AckingCoordinator, OutcomeKind};
use crate::config::TopologyConfig;
use crate::constants::DEFAULT_STREAM;
use crate::hooks::TaskHookDispatcher;
use crate::metrics::MetricsAggregator;
use crate::topology::{Spout, SpoutOutputCollector, TaskContext, TaskId, TupleTransport};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// Single-threaded execution loop owning one spout instance.
///
/// Each iteration drains completed root outcomes into the spout's
/// `ack`/`fail` callbacks before polling `next_tuple`, and enforces the
/// pending-window bound: once `max_spout_pending` roots are open, polling
/// pauses until outcomes drain. The coordinator itself never rejects opens;
/// admission control lives here.
pub struct SpoutExecutor<S: Spout> {
    spout: S,
    task_id: TaskId,
    config: TopologyConfig,
    coordinator: Arc<AckingCoordinator>,
    dispatcher: Arc<TaskHookDispatcher>,
    metrics: Arc<MetricsAggregator>,
    transport: Arc<dyn TupleTransport>,
}

impl<S: Spout> SpoutExecutor<S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spout: S,
        task_id: TaskId,
        config: TopologyConfig,
        coordinator: Arc<AckingCoordinator>,
        dispatcher: Arc<TaskHookDispatcher>,
        metrics: Arc<MetricsAggregator>,
        transport: Arc<dyn TupleTransport>,
    ) -> Self {
        Self {
            spout,
            task_id,
            config,
            coordinator,
            dispatcher,
            metrics,
            transport,
        }
    }

    /// Run the spout loop until the shutdown signal flips
    pub async fn run(mut self, shutdown: watch::Receiver<bool>) {
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        self.coordinator.register_spout(self.task_id, outcome_tx.clone());

        let context = TaskContext::new(
            self.task_id,
            self.dispatcher.clone(),
            self.metrics.clone(),
        );
        let mut collector = SpoutOutputCollector::new(
            self.task_id,
            DEFAULT_STREAM.to_string(),
            self.config.reliability.acking_enabled,
            self.coordinator.clone(),
            self.dispatcher.clone(),
            self.transport.clone(),
            outcome_tx,
        );

        info!(task_id = self.task_id, "Spout task starting");
        self.spout.open(&self.config, &context).await;
        self.dispatcher.on_prepare(self.task_id);

        let max_pending = self.config.reliability.max_spout_pending;
        loop {
            if *shutdown.borrow() {
                break;
            }

            // Outcomes stay ahead of new emits so replays are prompt.
            while let Ok(outcome) = outcome_rx.try_recv() {
                match outcome.kind {
                    OutcomeKind::Acked { complete_latency_ms } => {
                        debug!(
                            task_id = self.task_id,
                            message_id = %outcome.message_id,
                            complete_latency_ms,
                            "Root acked"
                        );
                        self.spout.ack(&outcome.message_id).await;
                    }
                    OutcomeKind::Failed { fail_latency_ms } => {
                        debug!(
                            task_id = self.task_id,
                            message_id = %outcome.message_id,
                            fail_latency_ms,
                            "Root failed; invoking replay callback"
                        );
                        self.spout.fail(&outcome.message_id).await;
                    }
                }
            }

            if self.config.reliability.acking_enabled
                && self.coordinator.pending_count() >= max_pending
            {
                // Window full: wait for outcomes rather than emitting.
                tokio::time::sleep(Duration::from_millis(1)).await;
                continue;
            }

            let emitted_before = collector.emitted();
            self.spout.next_tuple(&mut collector).await;
            if collector.emitted() == emitted_before {
                // Idle poll: back off instead of spinning on an exhausted
                // or rate-limited spout.
                tokio::time::sleep(Duration::from_millis(1)).await;
            } else {
                tokio::task::yield_now().await;
            }
        }

        info!(task_id = self.task_id, "Spout task shutting down");
        self.spout.close().await;
        self.dispatcher.on_cleanup(self.task_id);
    }
}
