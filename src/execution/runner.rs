//! # Topology Runner
//!
//! In-process harness wiring spout and bolt tasks over the channel
//! transport, with the timeout sweeper running alongside. DAG submission
//! and distributed placement stay out of scope; this runner covers local
//! execution and tests.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use topology_core::config::TopologyConfig;
//! use topology_core::execution::TopologyRunner;
//! use topology_core::test_helpers::{AckPolicy, CountBolt, WordSpout};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut runner = TopologyRunner::new(TopologyConfig::default());
//! runner.add_bolt(CountBolt::new(AckPolicy::AckAll));
//! runner.add_spout(WordSpout::with_limit(100));
//! // ... wait for the pipeline to drain ...
//! runner.shutdown().await;
//! # }
//! ```

use crate::acking::AckingCoordinator;
use crate::config::TopologyConfig;
use crate::execution::bolt_executor::BoltExecutor;
use crate::execution::spout_executor::SpoutExecutor;
use crate::hooks::TaskHookDispatcher;
use crate::metrics::MetricsAggregator;
use crate::topology::{Bolt, ChannelTransport, Spout, TaskId};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Local topology harness.
///
/// Bolts must be added before spouts: the channel transport routes
/// round-robin across the consumers registered at emit time, and a spout
/// emitting into an empty topology drops its tuples.
pub struct TopologyRunner {
    config: TopologyConfig,
    metrics: Arc<MetricsAggregator>,
    dispatcher: Arc<TaskHookDispatcher>,
    coordinator: Arc<AckingCoordinator>,
    transport: Arc<ChannelTransport>,
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
    next_task_id: TaskId,
}

impl TopologyRunner {
    /// Create a runner and start its timeout sweeper
    pub fn new(config: TopologyConfig) -> Self {
        let metrics = Arc::new(MetricsAggregator::new());
        let dispatcher = Arc::new(TaskHookDispatcher::new(metrics.clone()));
        let coordinator = Arc::new(AckingCoordinator::new(
            config.reliability.message_timeout(),
            dispatcher.clone(),
        ));
        let transport = Arc::new(ChannelTransport::new());
        let (shutdown, _) = watch::channel(false);

        let mut runner = Self {
            config,
            metrics,
            dispatcher,
            coordinator,
            transport,
            shutdown,
            handles: Vec::new(),
            next_task_id: 1,
        };
        runner.spawn_sweeper();
        runner
    }

    /// Spawn a spout task; returns its task id
    pub fn add_spout(&mut self, spout: impl Spout + 'static) -> TaskId {
        let task_id = self.allocate_task_id();
        let executor = SpoutExecutor::new(
            spout,
            task_id,
            self.config.clone(),
            self.coordinator.clone(),
            self.dispatcher.clone(),
            self.metrics.clone(),
            self.transport.clone(),
        );
        let shutdown_rx = self.shutdown.subscribe();
        self.handles.push(tokio::spawn(executor.run(shutdown_rx)));
        task_id
    }

    /// Spawn a bolt task consuming from the shared transport; returns its task id
    pub fn add_bolt(&mut self, bolt: impl Bolt + 'static) -> TaskId {
        let task_id = self.allocate_task_id();
        let input = self.transport.register_consumer(task_id);
        let executor = BoltExecutor::new(
            bolt,
            task_id,
            self.config.clone(),
            self.coordinator.clone(),
            self.dispatcher.clone(),
            self.metrics.clone(),
            self.transport.clone(),
            input,
        );
        let shutdown_rx = self.shutdown.subscribe();
        self.handles.push(tokio::spawn(executor.run(shutdown_rx)));
        task_id
    }

    /// Shared metric counters
    pub fn metrics(&self) -> &Arc<MetricsAggregator> {
        &self.metrics
    }

    /// Shared hook dispatcher (for registrations outside any stage)
    pub fn dispatcher(&self) -> &Arc<TaskHookDispatcher> {
        &self.dispatcher
    }

    /// Shared acking coordinator
    pub fn coordinator(&self) -> &Arc<AckingCoordinator> {
        &self.coordinator
    }

    /// Signal every task to stop and wait for all loops to exit
    pub async fn shutdown(mut self) {
        info!(tasks = self.handles.len(), "Shutting down topology");
        let _ = self.shutdown.send(true);
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
    }

    fn allocate_task_id(&mut self) -> TaskId {
        let task_id = self.next_task_id;
        self.next_task_id += 1;
        task_id
    }

    fn spawn_sweeper(&mut self) {
        let coordinator = self.coordinator.clone();
        let interval = self.config.workers.sweep_interval();
        let mut shutdown_rx = self.shutdown.subscribe();
        self.handles.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        coordinator.sweep_timeouts();
                    }
                }
            }
        }));
    }
}
