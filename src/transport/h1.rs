//! Request/response exchange over an established connection.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::{timeout_at, Instant};

use crate::config::RequestConfig;
use crate::error::{Error, Result, TimeoutPhase};
use crate::transport::connector::MaybeHttpsStream;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Write the request and read the raw response until the peer closes.
///
/// The total deadline covers both the write and every read. Because the
/// request carries `Connection: close`, EOF is the normal end-of-body
/// signal, not an error. Bytes from earlier reads are never discarded.
pub(crate) async fn exchange(
    mut stream: MaybeHttpsStream,
    request: &[u8],
    config: &RequestConfig,
) -> Result<Vec<u8>> {
    let deadline = Instant::now() + config.total_timeout;

    timeout_at(deadline, write_request(&mut stream, request))
        .await
        .map_err(|_| Error::timeout(TimeoutPhase::Request, config.total_timeout))??;

    let mut response = Vec::with_capacity(READ_CHUNK_SIZE);
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = timeout_at(deadline, stream.read(&mut buf))
            .await
            .map_err(|_| Error::timeout(TimeoutPhase::Read, config.total_timeout))?
            .map_err(|e| Error::network_io("failed to read response", e))?;
        if n == 0 {
            break;
        }
        response.extend_from_slice(&buf[..n]);
        if config.max_response_size > 0 && response.len() > config.max_response_size {
            return Err(Error::parse(format!(
                "response exceeds maximum size of {} bytes",
                config.max_response_size
            )));
        }
    }

    tracing::trace!(bytes = response.len(), "response read to EOF");

    if stream.is_tls() {
        // Best-effort close_notify; the connection is going away anyway.
        let _ = stream.shutdown().await;
    }

    Ok(response)
}

async fn write_request(stream: &mut MaybeHttpsStream, request: &[u8]) -> Result<()> {
    stream
        .write_all(request)
        .await
        .map_err(|e| Error::network_io("failed to write request", e))?;
    stream
        .flush()
        .await
        .map_err(|e| Error::network_io("failed to flush request", e))?;
    Ok(())
}
