//! Transport orchestration.
//!
//! One request per connection: resolve the host, connect (with a TLS
//! handshake for `https`), write the serialized request, and read the raw
//! response until the peer closes. The connect and write+read phases each
//! run under their own deadline.

pub mod connector;
pub mod h1;

pub use connector::{MaybeHttpsStream, TlsContext};

use crate::config::RequestConfig;
use crate::error::Result;
use crate::url::ParsedUrl;

/// Perform one request/response exchange, returning the raw response bytes.
pub(crate) async fn send(
    url: &ParsedUrl,
    request: &[u8],
    config: &RequestConfig,
    tls: &mut TlsContext,
) -> Result<Vec<u8>> {
    let stream = connector::connect(url, config, tls).await?;
    h1::exchange(stream, request, config).await
}
