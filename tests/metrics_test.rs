//! Metrics aggregator tests, including the lost-update property under
//! concurrent increments.

use std::sync::Arc;
use topology_core::metrics::MetricsAggregator;

#[test]
fn concurrent_increments_are_never_lost() {
    const THREADS: usize = 8;
    const INCREMENTS: usize = 5_000;

    let metrics = Arc::new(MetricsAggregator::new());
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let metrics = metrics.clone();
            std::thread::spawn(move || {
                for _ in 0..INCREMENTS {
                    metrics.increment("shared_counter");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        metrics.get("shared_counter"),
        Some((THREADS * INCREMENTS) as u64)
    );
}

#[test]
fn distinct_names_do_not_interfere() {
    let metrics = Arc::new(MetricsAggregator::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let metrics = metrics.clone();
            std::thread::spawn(move || {
                let name = format!("counter_{i}");
                for _ in 0..1_000 {
                    metrics.increment(&name);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..4 {
        assert_eq!(metrics.get(&format!("counter_{i}")), Some(1_000));
    }
    assert_eq!(metrics.counter_count(), 4);
}
