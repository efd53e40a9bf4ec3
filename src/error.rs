//! # Topology Error Types
//!
//! Structured error handling for the reliability core using thiserror
//! instead of `Box<dyn Error>` patterns. No failure here is process-fatal:
//! `UnknownRoot` reflects expected races with the timeout sweeper, and
//! replayable failures (bolt fails, timeouts) are recovered by re-emission
//! and never surface as errors at all.

use crate::topology::MessageId;
use thiserror::Error;

/// Error taxonomy for the reliability core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Duplicate message id: '{message_id}' is already in flight")]
    DuplicateMessageId { message_id: MessageId },

    #[error("Unknown root: '{message_id}' is not open (already closed or never opened)")]
    UnknownRoot { message_id: MessageId },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl TopologyError {
    /// Create a duplicate message id error
    pub fn duplicate_message_id(message_id: MessageId) -> Self {
        Self::DuplicateMessageId { message_id }
    }

    /// Create an unknown root error
    pub fn unknown_root(message_id: MessageId) -> Self {
        Self::UnknownRoot { message_id }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for TopologyError {
    fn from(err: config::ConfigError) -> Self {
        TopologyError::configuration(err.to_string())
    }
}

/// Result type alias for topology operations
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Error type a task hook may raise. Hook failures never cross the
/// dispatcher boundary; they are logged and dispatch continues.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by every hook method
pub type HookResult = std::result::Result<(), HookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TopologyError::duplicate_message_id(MessageId::new("w1"));
        let display_str = format!("{err}");
        assert!(display_str.contains("Duplicate message id"));
        assert!(display_str.contains("w1"));

        let err = TopologyError::unknown_root(MessageId::new("w2"));
        let display_str = format!("{err}");
        assert!(display_str.contains("Unknown root"));
        assert!(display_str.contains("w2"));
    }

    #[test]
    fn test_config_error_conversion() {
        let cfg_err = config::ConfigError::NotFound("reliability".to_string());
        let err: TopologyError = cfg_err.into();
        assert!(matches!(err, TopologyError::Configuration { .. }));
    }
}
