//! Error types for the wraith crate.

use std::fmt;
use std::io;
use std::time::Duration;

use bytes::Bytes;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The request phase during which a deadline expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPhase {
    /// DNS + TCP connect + TLS handshake.
    Connect,
    /// Writing the serialized request.
    Request,
    /// Reading the response.
    Read,
}

impl fmt::Display for TimeoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutPhase::Connect => f.write_str("connect"),
            TimeoutPhase::Request => f.write_str("request"),
            TimeoutPhase::Read => f.write_str("read"),
        }
    }
}

/// Errors that can occur during HTTP operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// DNS, connect, write, or generic socket failure.
    #[error("network error: {message}")]
    Network {
        message: String,
        /// OS-level error code, when one was observed.
        code: Option<i32>,
    },

    /// Deadline exceeded during the named phase.
    #[error("{phase} timeout after {limit:?}")]
    Timeout { phase: TimeoutPhase, limit: Duration },

    /// TLS handshake, certificate verification, or CA bundle load failure.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Malformed input URL (own or redirect target).
    #[error("invalid URL: {0}")]
    Url(String),

    /// Malformed response framing, or response exceeding the size limit.
    #[error("parse error: {0}")]
    Parse(String),

    /// Non-2xx response, raised only via `Response::error_for_status`.
    #[error("HTTP status {status}")]
    Status { status: u16, body: Bytes },
}

impl Error {
    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: None,
        }
    }

    /// Create a network error from an IO error, keeping the OS error code.
    pub fn network_io(context: &str, err: io::Error) -> Self {
        Self::Network {
            message: format!("{}: {}", context, err),
            code: err.raw_os_error(),
        }
    }

    /// Create a timeout error for the given phase.
    pub fn timeout(phase: TimeoutPhase, limit: Duration) -> Self {
        Self::Timeout { phase, limit }
    }

    /// Create a TLS error.
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a URL error.
    pub fn url(message: impl Into<String>) -> Self {
        Self::Url(message.into())
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Numeric code associated with this error, when one exists.
    ///
    /// Network errors carry the OS errno from the failed socket call;
    /// status errors carry the HTTP status code.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::Network { code, .. } => *code,
            Error::Status { status, .. } => Some(i32::from(*status)),
            _ => None,
        }
    }

    /// Whether this error is a timeout in the given phase.
    pub fn is_timeout(&self, phase: TimeoutPhase) -> bool {
        matches!(self, Error::Timeout { phase: p, .. } if *p == phase)
    }
}
