//! Error types for the GlusterFS volume driver

use std::time::Duration;

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling and mounting a volume
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Input Validation Errors
    // =========================================================================
    /// Volume URI could not be parsed
    #[error("Invalid volume URI '{uri}': {reason}")]
    InvalidVolumeUri { uri: String, reason: String },

    /// Required driver option missing from the volume descriptor
    #[error("Missing required volume option: {0}")]
    MissingOption(String),

    // =========================================================================
    // Management REST Errors
    // =========================================================================
    /// Transport failure talking to the management API
    #[error("GlusterFS REST connection error: {0}")]
    RestConnection(#[source] reqwest::Error),

    /// Response body was not a valid envelope
    #[error("Failed to parse GlusterFS REST response: {0}")]
    RestResponseParse(String),

    /// Server answered with `ok: false`
    #[error("GlusterFS REST {operation} rejected: {message}")]
    RestRejected { operation: String, message: String },

    // =========================================================================
    // Mount Errors
    // =========================================================================
    /// Mount command exited unsuccessfully
    #[error("Mount command '{command}' failed (exit code {code:?}): {output}")]
    MountFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// Mount command exceeded its time bound and was killed
    #[error("Mount command '{command}' timed out after {timeout:?}")]
    MountTimeout { command: String, timeout: Duration },

    // =========================================================================
    // General Errors
    // =========================================================================
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The message the management server gave when it rejected a request.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::RestRejected { message, .. } => Some(message),
            _ => None,
        }
    }

    /// True for errors raised before any network or mount side effect.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidVolumeUri { .. } | Error::MissingOption(_)
        )
    }
}
