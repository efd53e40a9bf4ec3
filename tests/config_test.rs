//! Configuration loading tests: file sources, environment overrides, and
//! validation failures.

use parking_lot::Mutex;
use std::fs;
use topology_core::config::TopologyConfig;
use topology_core::TopologyError;

// `from_file` reads the process environment, so tests touching or depending
// on it must not interleave under the parallel test runner.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn file_load_and_env_override() {
    let _env = ENV_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("topology.yaml");
    fs::write(
        &path,
        r#"
reliability:
  acking_enabled: true
  message_timeout_seconds: 5
  max_spout_pending: 10
workers:
  sweep_interval_ms: 20
"#,
    )
    .unwrap();

    // Plain file load first.
    let config = TopologyConfig::from_file(&path).unwrap();
    assert!(config.reliability.acking_enabled);
    assert_eq!(config.reliability.message_timeout_seconds, 5);
    assert_eq!(config.reliability.max_spout_pending, 10);
    assert_eq!(config.workers.sweep_interval_ms, 20);

    // Environment wins over the file.
    std::env::set_var("TOPOLOGY_RELIABILITY__MESSAGE_TIMEOUT_SECONDS", "7");
    let config = TopologyConfig::from_file(&path).unwrap();
    std::env::remove_var("TOPOLOGY_RELIABILITY__MESSAGE_TIMEOUT_SECONDS");
    assert_eq!(config.reliability.message_timeout_seconds, 7);
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let _env = ENV_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("topology.yaml");
    fs::write(
        &path,
        r#"
reliability:
  acking_enabled: false
"#,
    )
    .unwrap();

    let config = TopologyConfig::from_file(&path).unwrap();
    assert!(!config.reliability.acking_enabled);
    assert_eq!(
        config.reliability.message_timeout_seconds,
        topology_core::constants::defaults::MESSAGE_TIMEOUT_SECONDS
    );
    assert_eq!(
        config.workers.sweep_interval_ms,
        topology_core::constants::defaults::SWEEP_INTERVAL_MS
    );
}

#[test]
fn invalid_values_are_rejected_at_load() {
    let _env = ENV_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("topology.yaml");
    fs::write(
        &path,
        r#"
reliability:
  message_timeout_seconds: 0
"#,
    )
    .unwrap();

    let err = TopologyConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, TopologyError::Configuration { .. }));
    assert!(err.to_string().contains("message_timeout_seconds"));
}

#[test]
fn missing_file_is_a_configuration_error() {
    let _env = ENV_LOCK.lock();
    let err = TopologyConfig::from_file("/nonexistent/topology.yaml").unwrap_err();
    assert!(matches!(err, TopologyError::Configuration { .. }));
}
