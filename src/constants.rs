//! # System Constants
//!
//! Core constants that define the operational boundaries of the topology
//! reliability core: canonical hook counter names, stream defaults, and
//! configuration fallbacks.

/// Counter names incremented by the hook dispatcher, one per lifecycle event.
///
/// The names are stable and consumed by external metrics reporters, so they
/// are defined once here rather than inlined at dispatch sites.
pub mod hook_metrics {
    pub const HOOK_PREPARE: &str = "hook_prepare";
    pub const HOOK_CLEANUP: &str = "hook_cleanup";
    pub const HOOK_EMIT: &str = "hook_emit";
    pub const HOOK_SPOUT_ACK: &str = "hook_spoutAck";
    pub const HOOK_SPOUT_FAIL: &str = "hook_spoutFail";
    pub const HOOK_BOLT_EXECUTE: &str = "hook_boltExecute";
    pub const HOOK_BOLT_ACK: &str = "hook_boltAck";
    pub const HOOK_BOLT_FAIL: &str = "hook_boltFail";
}

/// Stream name used when a stage emits without naming a stream explicitly.
pub const DEFAULT_STREAM: &str = "default";

/// Configuration fallbacks applied when a field is absent from the config
/// source. Kept in one place so `Default` impls and docs agree.
pub mod defaults {
    /// Roots with no terminal signal after this many seconds are replayed.
    pub const MESSAGE_TIMEOUT_SECONDS: u64 = 30;

    /// Upper bound on simultaneously in-flight root tuples per process.
    pub const MAX_SPOUT_PENDING: usize = 1000;

    /// How often the timeout sweeper wakes up.
    pub const SWEEP_INTERVAL_MS: u64 = 100;
}
