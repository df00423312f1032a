//! Error types for the Chronos client

use chronos_core::schedule::ScheduleError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Chronos client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected before any request was sent
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Request body could not be encoded as JSON
    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Connection, TLS or timeout failure; no response was received
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was present but was not the expected JSON
    #[error("Failed to parse response (status {status}): {source}")]
    Decode {
        /// HTTP status code
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// API returned a status outside 2xx
    #[error("{status_line}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Status line as sent by the server, e.g. "404 Not Found"
        status_line: String,
    },

    /// Connectivity check failed while creating the client
    #[error("Could not reach chronos cluster: {0}")]
    Unreachable(#[source] Box<ClientError>),
}

impl ClientError {
    /// Create a service error from status code and status line
    pub fn service(status: u16, status_line: impl Into<String>) -> Self {
        Self::Service {
            status,
            status_line: status_line.into(),
        }
    }

    /// HTTP status code of the response that caused this error, if one arrived
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Decode { status, .. } | Self::Service { status, .. } => Some(*status),
            Self::Unreachable(inner) => inner.status(),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// Check if this error came from the connectivity check
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable(_))
    }
}

impl From<ScheduleError> for ClientError {
    fn from(err: ScheduleError) -> Self {
        Self::Validation(err.to_string())
    }
}
