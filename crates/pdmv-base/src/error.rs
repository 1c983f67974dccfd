//! Error types for PdmV client operations
//!
//! Every failure a client call can produce is one of the variants below. The
//! three wire-level kinds (network, HTTP status, JSON decode) are kept apart so
//! callers can tell them apart without parsing messages.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value required by the selected credential mode is missing.
    #[error("Missing required configuration value: {0}")]
    MissingValue(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Client error types.
///
/// These errors come from the transport and the response handling in
/// [`BaseClient`](crate::BaseClient); the application clients add none of
/// their own.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request could not be performed (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status code.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Response body is not valid JSON.
    #[error("Invalid JSON response: {message}")]
    Decode {
        /// Decoder message.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// Client configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failure reported by a custom [`Transport`](crate::Transport).
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// HTTP status code, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the server rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Check if the server reported a missing resource.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if the failure happened before any response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Transport(_))
    }

    /// Get error code for logs and diagnostics.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Status { .. } => "HTTP_STATUS",
            ClientError::Decode { .. } => "DECODE_ERROR",
            ClientError::Config(_) => "CONFIG_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
        }
    }
}
