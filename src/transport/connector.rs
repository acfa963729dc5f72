//! BoringSSL TLS context and connection establishment.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use boring::ssl::{SslConnector, SslMethod, SslVerifyMode};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::{timeout_at, Instant};
use tokio_boring::SslStream;

use crate::config::RequestConfig;
use crate::error::{Error, Result, TimeoutPhase};
use crate::url::ParsedUrl;

/// Per-client TLS state.
///
/// The default connector verifies peers against the system trust store.
/// A call supplying `ca_bundle_path` swaps in a connector built around that
/// bundle instead; the rebuilt connector is cached by path so repeated calls
/// with the same bundle reuse it. Verification mode is applied per call on
/// the connect configuration.
pub struct TlsContext {
    default: SslConnector,
    custom: Option<(PathBuf, SslConnector)>,
}

impl TlsContext {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            default: build_connector(None)?,
            custom: None,
        })
    }

    fn connector_for(&mut self, ca_bundle: Option<&Path>) -> Result<&SslConnector> {
        let path = match ca_bundle {
            None => return Ok(&self.default),
            Some(path) => path,
        };
        let cached = self.custom.as_ref().is_some_and(|(p, _)| p == path);
        if !cached {
            let connector = build_connector(Some(path))?;
            self.custom = Some((path.to_path_buf(), connector));
        }
        Ok(&self.custom.as_ref().expect("just populated").1)
    }
}

fn build_connector(ca_bundle: Option<&Path>) -> Result<SslConnector> {
    let mut builder = SslConnector::builder(SslMethod::tls_client())
        .map_err(|e| Error::tls(format!("failed to create TLS context: {}", e)))?;
    if let Some(path) = ca_bundle {
        builder.set_ca_file(path).map_err(|e| {
            Error::tls(format!("failed to load CA bundle {}: {}", path.display(), e))
        })?;
    }
    Ok(builder.build())
}

/// Stream that is either plain TCP for `http` or TLS-wrapped for `https`.
#[derive(Debug)]
pub enum MaybeHttpsStream {
    Http(TcpStream),
    Https(SslStream<TcpStream>),
}

impl MaybeHttpsStream {
    /// Whether this is a TLS stream.
    pub fn is_tls(&self) -> bool {
        matches!(self, MaybeHttpsStream::Https(_))
    }
}

impl AsyncRead for MaybeHttpsStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut *self {
            MaybeHttpsStream::Http(stream) => Pin::new(stream).poll_read(cx, buf),
            MaybeHttpsStream::Https(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MaybeHttpsStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut *self {
            MaybeHttpsStream::Http(stream) => Pin::new(stream).poll_write(cx, buf),
            MaybeHttpsStream::Https(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            MaybeHttpsStream::Http(stream) => Pin::new(stream).poll_flush(cx),
            MaybeHttpsStream::Https(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            MaybeHttpsStream::Http(stream) => Pin::new(stream).poll_shutdown(cx),
            MaybeHttpsStream::Https(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

/// Resolve the host and connect, performing the TLS handshake for `https`.
///
/// The connect deadline covers the TCP connect and the TLS handshake; its
/// expiry drops the in-flight future, which closes the socket and is
/// reported as a connect-phase timeout.
pub(crate) async fn connect(
    url: &ParsedUrl,
    config: &RequestConfig,
    tls: &mut TlsContext,
) -> Result<MaybeHttpsStream> {
    // TLS configuration failures (including CA bundle load) surface before
    // any network activity. The bundle only participates when verification
    // is on; verify_tls=false skips verification entirely.
    let ssl_config = if url.is_tls() {
        let bundle = if config.verify_tls {
            config.ca_bundle_path.as_deref()
        } else {
            None
        };
        let connector = tls.connector_for(bundle)?;
        let mut conf = connector
            .configure()
            .map_err(|e| Error::tls(format!("failed to configure TLS: {}", e)))?;
        if !config.verify_tls {
            conf.set_verify(SslVerifyMode::NONE);
            conf.set_verify_hostname(false);
        }
        Some(conf)
    } else {
        None
    };

    let addrs: Vec<SocketAddr> = lookup_host((url.host.as_str(), url.port))
        .await
        .map_err(|e| Error::network_io(&format!("failed to resolve {}", url.host), e))?
        .collect();
    if addrs.is_empty() {
        return Err(Error::network(format!(
            "no addresses found for {}",
            url.host
        )));
    }

    let deadline = Instant::now() + config.connect_timeout;

    let tcp = timeout_at(deadline, connect_any(&addrs))
        .await
        .map_err(|_| Error::timeout(TimeoutPhase::Connect, config.connect_timeout))??;

    tracing::debug!(
        host = %url.host,
        port = url.port,
        tls = url.is_tls(),
        verify = config.verify_tls,
        "connected"
    );

    match ssl_config {
        Some(conf) => {
            // The URL host doubles as the SNI name; the handshake reuses
            // the connect deadline.
            let stream = timeout_at(deadline, tokio_boring::connect(conf, &url.host, tcp))
                .await
                .map_err(|_| Error::timeout(TimeoutPhase::Connect, config.connect_timeout))?
                .map_err(|e| Error::tls(format!("TLS handshake failed: {}", e)))?;
            Ok(MaybeHttpsStream::Https(stream))
        }
        None => Ok(MaybeHttpsStream::Http(tcp)),
    }
}

/// Try the resolved addresses in order; the first successful connection
/// wins, and the last OS error is reported if none succeed.
async fn connect_any(addrs: &[SocketAddr]) -> Result<TcpStream> {
    let mut last_err: Option<io::Error> = None;
    for &addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::trace!(%addr, error = %e, "connect attempt failed");
                last_err = Some(e);
            }
        }
    }
    Err(match last_err {
        Some(e) => Error::network_io("failed to connect", e),
        None => Error::network("no addresses to connect to"),
    })
}
