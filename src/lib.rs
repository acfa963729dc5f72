//! # Wraith
//!
//! Synchronous HTTP/1.1 client implemented directly over TCP sockets and
//! BoringSSL, with no HTTP library underneath. Every request opens a fresh
//! connection and sends `Connection: close`; the peer closing the stream is
//! the end-of-body signal. Connect and write/read phases each run under a
//! deadline that force-cancels the blocked operation on expiry.
//!
//! ```rust,no_run
//! use wraith::{Client, RequestConfig};
//! use std::time::Duration;
//!
//! # fn main() -> wraith::Result<()> {
//! let mut client = Client::new()?;
//! let response = client
//!     .get("https://example.com/")
//!     .header("Accept", "text/html")
//!     .config(RequestConfig::new().connect_timeout(Duration::from_secs(5)))
//!     .send()?;
//! assert!(response.is_success());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod request;
pub mod response;
pub mod transport;
pub mod url;

// Re-exports
pub use client::{Client, RequestBuilder};
pub use config::RequestConfig;
pub use error::{Error, Result, TimeoutPhase};
pub use headers::Headers;
pub use http::Method;
pub use response::Response;
pub use url::{ParsedUrl, Scheme};
