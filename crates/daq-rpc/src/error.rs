//! Error types for the RPC server.

use std::fmt::Display;

use thiserror::Error;

/// Result type alias for RPC operations.
pub type Result<T> = std::result::Result<T, RpcError>;

/// Errors raised while serving RPC requests.
///
/// Everything except the transport variants is sent back to the client as a
/// failed reply; the connection stays open.
#[derive(Error, Debug)]
pub enum RpcError {
    /// Requested method is not exposed by the target
    #[error("Unknown method '{name}'")]
    UnknownMethod {
        /// Requested name
        name: String,
    },

    /// Arguments missing, surplus or of the wrong type
    #[error("Invalid arguments for '{method}': {message}")]
    BadArguments {
        /// Method called
        method: String,
        /// What was wrong
        message: String,
    },

    /// The target itself reported a failure
    #[error("{message}")]
    Target {
        /// Error kind reported to the client
        kind: String,
        /// Error message
        message: String,
    },

    /// Request line is not valid JSON or has an unknown action
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// None of the requested addresses could be bound
    #[error("No RPC listener could be bound")]
    NoListeners,

    /// Socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reply could not be serialized
    #[error("Failed to encode reply: {0}")]
    Encode(#[from] serde_json::Error),
}

impl RpcError {
    /// Wrap a target failure, keeping its kind for the client.
    pub fn target(kind: impl Into<String>, err: impl Display) -> Self {
        Self::Target {
            kind: kind.into(),
            message: err.to_string(),
        }
    }

    /// Shorthand for [`RpcError::BadArguments`].
    pub fn bad_arguments(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadArguments {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Exception type reported in failed replies.
    pub fn kind(&self) -> &str {
        match self {
            Self::UnknownMethod { .. } => "UnknownMethod",
            Self::BadArguments { .. } => "BadArguments",
            Self::Target { kind, .. } => kind,
            Self::MalformedRequest(_) => "MalformedRequest",
            Self::NoListeners => "NoListeners",
            Self::Io(_) => "Io",
            Self::Encode(_) => "Encode",
        }
    }
}
