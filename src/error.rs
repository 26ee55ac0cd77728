//! Error types for telemetry decoding and session management.
//!
//! Decode errors are always recoverable: the session converts them into a
//! dropped datagram and keeps listening. The only error a caller of the live
//! session ever sees is a bind failure at start.
//!
//! ## Error Categories
//!
//! - **Decode Errors**: truncated buffers and out-of-range car indices
//! - **Socket Errors**: bind failures and transient receive failures
//! - **Configuration Errors**: invalid values or unreadable config files
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use racewire::TelemetryError;
//!
//! let error = TelemetryError::truncated("packet header", 29, 12);
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for telemetry operations.
pub type Result<T, E = TelemetryError> = std::result::Result<T, E>;

/// Main error type for telemetry operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TelemetryError {
    #[error("Truncated input decoding {context}: need {needed} bytes, have {available}")]
    TruncatedInput { context: &'static str, needed: usize, available: usize },

    #[error("Car index {index} out of range for {len} decoded records")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to bind UDP socket on {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Socket error during {operation}")]
    Socket {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    Config {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration file error: {path}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TelemetryError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            TelemetryError::TruncatedInput { .. } => true,
            TelemetryError::IndexOutOfRange { .. } => true,
            TelemetryError::Socket { .. } => true,
            TelemetryError::Bind { .. } => false,
            TelemetryError::Config { .. } => false,
            TelemetryError::ConfigFile { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TelemetryError::TruncatedInput { .. } => vec![
                "Drop the datagram and wait for the next packet",
                "Check the game's UDP format setting matches this decoder",
                "Verify nothing else is sending to the telemetry port",
            ],
            TelemetryError::IndexOutOfRange { .. } => vec![
                "Drop the datagram and wait for the next packet",
                "Check the player car index reported in the header",
            ],
            TelemetryError::Bind { .. } => vec![
                "Check no other application is using the telemetry port",
                "Verify the bind address exists on this machine",
                "Try binding to 0.0.0.0 to accept packets from other hosts",
            ],
            TelemetryError::Socket { .. } => vec![
                "Keep listening, receive errors are usually transient",
                "Check firewall rules for the telemetry port",
            ],
            TelemetryError::Config { .. } => vec![
                "Check configuration values are within range",
                "Remove the offending key to fall back to its default",
            ],
            TelemetryError::ConfigFile { .. } => vec![
                "Check the config file exists and is readable",
                "Check file permissions",
            ],
        }
    }

    /// Helper constructor for truncated input errors.
    pub fn truncated(context: &'static str, needed: usize, available: usize) -> Self {
        TelemetryError::TruncatedInput { context, needed, available }
    }

    /// Helper constructor for out-of-range car index errors.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        TelemetryError::IndexOutOfRange { index, len }
    }

    /// Helper constructor for bind failures.
    pub fn bind_failed(address: impl Into<String>, source: std::io::Error) -> Self {
        TelemetryError::Bind { address: address.into(), source }
    }

    /// Helper constructor for socket failures.
    pub fn socket_error(operation: impl Into<String>, source: std::io::Error) -> Self {
        TelemetryError::Socket { operation: operation.into(), source }
    }

    /// Helper constructor for configuration validation errors.
    pub fn config_invalid(reason: impl Into<String>) -> Self {
        TelemetryError::Config { reason: reason.into(), source: None }
    }

    /// Helper constructor for configuration errors with source.
    pub fn config_invalid_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TelemetryError::Config { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for config file errors with path context.
    pub fn config_file_error(path: PathBuf, source: std::io::Error) -> Self {
        TelemetryError::ConfigFile { path, source }
    }
}

impl From<serde_yaml_ng::Error> for TelemetryError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        TelemetryError::Config { reason: "YAML parse failure".to_string(), source: Some(Box::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
          #[test]
          fn error_messages_carry_their_context(
            needed in 1usize..4096usize,
            available in 0usize..4096usize,
            index in 0usize..256usize,
            len in 0usize..23usize,
            address in "[a-z0-9.:]{1,32}",
            reason in ".*"
          ) {
            let truncated = TelemetryError::truncated("packet header", needed, available);
            let msg = truncated.to_string();
            prop_assert!(msg.contains("packet header"));
            prop_assert!(msg.contains(&needed.to_string()));
            prop_assert!(msg.contains(&available.to_string()));

            let range = TelemetryError::index_out_of_range(index, len);
            let msg = range.to_string();
            prop_assert!(msg.contains(&index.to_string()));
            prop_assert!(msg.contains(&len.to_string()));

            let bind = TelemetryError::bind_failed(
              address.clone(),
              std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
            );
            prop_assert!(bind.to_string().contains(&address));

            let config = TelemetryError::config_invalid(reason.clone());
            prop_assert!(config.to_string().contains(&reason));
          }

          #[test]
          fn bind_errors_preserve_io_source(message in "[a-zA-Z ]{1,40}") {
            let err = TelemetryError::bind_failed(
              "127.0.0.1:20777",
              std::io::Error::new(std::io::ErrorKind::AddrInUse, message.clone()),
            );
            let source = std::error::Error::source(&err);
            prop_assert!(source.is_some());
            prop_assert_eq!(source.map(|s| s.to_string()), Some(message));
          }
        }
    }

    #[test]
    fn decode_errors_are_retryable_bind_errors_are_not() {
        assert!(TelemetryError::truncated("lap data record", 54, 10).is_retryable());
        assert!(TelemetryError::index_out_of_range(5, 2).is_retryable());

        let bind = TelemetryError::bind_failed(
            "127.0.0.1:20777",
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        );
        assert!(!bind.is_retryable());
        assert!(!TelemetryError::config_invalid("history_capacity must be positive").is_retryable());
    }

    #[test]
    fn every_variant_has_recovery_suggestions() {
        let errors = vec![
            TelemetryError::truncated("packet header", 29, 0),
            TelemetryError::index_out_of_range(0, 0),
            TelemetryError::bind_failed("x", std::io::Error::other("x")),
            TelemetryError::socket_error("recv", std::io::Error::other("x")),
            TelemetryError::config_invalid("x"),
            TelemetryError::config_file_error(PathBuf::from("/cfg.yaml"), std::io::Error::other("x")),
        ];

        for error in &errors {
            let suggestions = error.recovery_suggestions();
            assert!(!suggestions.is_empty(), "no suggestions for {:?}", error);
            for suggestion in suggestions {
                assert!(suggestion.len() > 5);
            }
        }
    }

    #[test]
    fn error_traits_validation() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<TelemetryError>();

        let error = TelemetryError::truncated("packet header", 29, 3);
        let _: &dyn std::error::Error = &error;
    }

    #[test]
    fn yaml_errors_convert_to_config() {
        let yaml_err = serde_yaml_ng::from_str::<u16>("not: [a number").unwrap_err();
        let err: TelemetryError = yaml_err.into();
        assert!(matches!(err, TelemetryError::Config { source: Some(_), .. }));
    }
}
