//! Bolt worker loop.

use crate::acking::AckingCoordinator;
use crate::config::TopologyConfig;
use crate::constants::DEFAULT_STREAM;
use crate::hooks::{BoltExecuteInfo, TaskHookDispatcher};
use crate::metrics::MetricsAggregator;
use crate::topology::{Bolt, OutputCollector, TaskContext, TaskId, Tuple, TupleTransport};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tracing::info;

/// Single-threaded execution loop owning one bolt instance.
///
/// Receives input tuples from the transport, measures execute latency, and
/// fires the `bolt_execute` lifecycle event after each `execute` returns.
/// Terminal ack/fail signaling is the bolt's responsibility through its
/// collector.
pub struct BoltExecutor<B: Bolt> {
    bolt: B,
    task_id: TaskId,
    config: TopologyConfig,
    coordinator: Arc<AckingCoordinator>,
    dispatcher: Arc<TaskHookDispatcher>,
    metrics: Arc<MetricsAggregator>,
    transport: Arc<dyn TupleTransport>,
    input: mpsc::UnboundedReceiver<Tuple>,
}

impl<B: Bolt> BoltExecutor<B> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bolt: B,
        task_id: TaskId,
        config: TopologyConfig,
        coordinator: Arc<AckingCoordinator>,
        dispatcher: Arc<TaskHookDispatcher>,
        metrics: Arc<MetricsAggregator>,
        transport: Arc<dyn TupleTransport>,
        input: mpsc::UnboundedReceiver<Tuple>,
    ) -> Self {
        Self {
            bolt,
            task_id,
            config,
            coordinator,
            dispatcher,
            metrics,
            transport,
            input,
        }
    }

    /// Run the bolt loop until shutdown or until the input channel closes
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let context = TaskContext::new(
            self.task_id,
            self.dispatcher.clone(),
            self.metrics.clone(),
        );
        let mut collector = OutputCollector::new(
            self.task_id,
            DEFAULT_STREAM.to_string(),
            self.coordinator.clone(),
            self.dispatcher.clone(),
            self.transport.clone(),
        );

        info!(task_id = self.task_id, "Bolt task starting");
        self.bolt.prepare(&self.config, &context).await;
        self.dispatcher.on_prepare(self.task_id);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                maybe_tuple = self.input.recv() => {
                    match maybe_tuple {
                        Some(tuple) => {
                            let started = Instant::now();
                            collector.begin_input(started);
                            self.bolt.execute(tuple.clone(), &mut collector).await;
                            self.dispatcher.on_bolt_execute(&BoltExecuteInfo {
                                tuple,
                                executing_task_id: self.task_id,
                                execute_latency_ms: started.elapsed().as_millis() as u64,
                            });
                        }
                        None => break,
                    }
                }
            }
        }

        info!(task_id = self.task_id, "Bolt task shutting down");
        self.bolt.cleanup().await;
        self.dispatcher.on_cleanup(self.task_id);
    }
}
