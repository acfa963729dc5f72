//! Per-request configuration.
//!
//! # Timeout Semantics
//!
//! - **connect_timeout**: deadline for DNS + TCP connect + TLS handshake.
//! - **total_timeout**: deadline covering writing the request and reading
//!   the full response. Does NOT reset between reads.
//!
//! Both deadlines are enforced by racing a timer against the blocking
//! operation; when the timer wins, the in-flight operation is cancelled and
//! the socket closed.

use std::path::PathBuf;
use std::time::Duration;

/// Configuration supplied per call. Immutable input; the client never
/// mutates it.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Deadline for writing the request and reading the response.
    pub total_timeout: Duration,

    /// Deadline for establishing the connection (DNS + TCP + TLS handshake).
    pub connect_timeout: Duration,

    /// Follow 3xx redirects carrying a `Location` header.
    pub follow_redirects: bool,

    /// Maximum number of redirect hops before the request fails.
    pub max_redirects: u32,

    /// Maximum response size in bytes. `0` means unlimited.
    pub max_response_size: usize,

    /// Verify the peer certificate during the TLS handshake.
    pub verify_tls: bool,

    /// CA bundle to verify against instead of the default trust store.
    pub ca_bundle_path: Option<PathBuf>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            total_timeout: Duration::from_millis(30_000),
            connect_timeout: Duration::from_millis(10_000),
            follow_redirects: true,
            max_redirects: 5,
            max_response_size: 0,
            verify_tls: true,
            ca_bundle_path: None,
        }
    }
}

impl RequestConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total (write + read) timeout.
    pub fn total_timeout(mut self, timeout: Duration) -> Self {
        self.total_timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable or disable redirect following.
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Set the maximum number of redirect hops.
    pub fn max_redirects(mut self, max: u32) -> Self {
        self.max_redirects = max;
        self
    }

    /// Cap the response size in bytes (`0` = unlimited).
    pub fn max_response_size(mut self, max: usize) -> Self {
        self.max_response_size = max;
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Verify against a CA bundle file instead of the default trust store.
    pub fn ca_bundle_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_bundle_path = Some(path.into());
        self
    }
}
