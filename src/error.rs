//! Error types for rosapi
//!
//! Provides a unified error type for all operations, tagged by the kind of
//! failure so callers can tell a broken transport from a rejected command.

use thiserror::Error;

/// Result type alias using RosError
pub type Result<T> = std::result::Result<T, RosError>;

/// Unified error type for rosapi operations
#[derive(Debug, Error)]
pub enum RosError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    // -------------------------------------------------------------------------
    // Login Errors
    // -------------------------------------------------------------------------
    #[error("Authentication failed: {0}")]
    Authentication(String),

    // -------------------------------------------------------------------------
    // Framing Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Router-reported Errors
    // -------------------------------------------------------------------------
    #[error("Router rejected command: {message}")]
    Operation {
        message: String,
        category: Option<String>,
    },

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("Invalid session state: expected {expected}, found {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`RosError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreachable host, timeout, reset, or any other transport failure
    Connection,
    /// Credentials rejected
    Authentication,
    /// Malformed framing or an unexpected marker
    Protocol,
    /// Router returned `!trap` for an otherwise valid command
    Operation,
    /// Operation attempted in the wrong session state
    State,
    /// Invalid configuration
    Config,
}

impl RosError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RosError::Io(_) | RosError::Connection(_) => ErrorKind::Connection,
            RosError::Authentication(_) => ErrorKind::Authentication,
            RosError::Protocol(_) => ErrorKind::Protocol,
            RosError::Operation { .. } => ErrorKind::Operation,
            RosError::InvalidState { .. } => ErrorKind::State,
            RosError::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether the session that produced this error has been torn down
    ///
    /// Operation, state, and configuration errors leave the connection usable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Connection | ErrorKind::Authentication | ErrorKind::Protocol
        )
    }

    /// Whether this is a read/write timeout on the transport
    pub fn is_timeout(&self) -> bool {
        match self {
            RosError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }
}
