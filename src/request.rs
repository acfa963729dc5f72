//! HTTP/1.1 request serialization.
//!
//! Every request is framed with `Connection: close`; the peer closing the
//! connection is the end-of-body signal on the response side, so no
//! persistent-connection or chunked machinery exists here.

use http::Method;

use crate::headers::Headers;
use crate::url::ParsedUrl;

/// Serialize a request into HTTP/1.1 wire bytes.
///
/// Emits, in order: the request line, a `Host` header (`host:port` only
/// when the port is non-default for the scheme), the caller's headers
/// verbatim in insertion order, `Content-Length` when the body is non-empty
/// and the method carries one, `Connection: close`, the blank line, and the
/// body. Header content is the caller's responsibility; nothing is escaped
/// or validated.
pub fn build_request(
    method: &Method,
    url: &ParsedUrl,
    headers: &Headers,
    body: &[u8],
) -> Vec<u8> {
    let mut request = Vec::with_capacity(256 + body.len());

    // Request line: METHOD path HTTP/1.1\r\n
    request.extend_from_slice(method.as_str().as_bytes());
    request.push(b' ');
    request.extend_from_slice(url.path.as_bytes());
    request.extend_from_slice(b" HTTP/1.1\r\n");

    // Host header, with the port only when non-default for the scheme.
    request.extend_from_slice(b"Host: ");
    request.extend_from_slice(url.host.as_bytes());
    if url.has_explicit_port() {
        request.push(b':');
        request.extend_from_slice(url.port.to_string().as_bytes());
    }
    request.extend_from_slice(b"\r\n");

    // Caller-supplied headers, preserving order.
    for (name, value) in headers.iter() {
        request.extend_from_slice(name.as_bytes());
        request.extend_from_slice(b": ");
        request.extend_from_slice(value.as_bytes());
        request.extend_from_slice(b"\r\n");
    }

    if !body.is_empty() && method_takes_body(method) {
        request.extend_from_slice(b"Content-Length: ");
        request.extend_from_slice(body.len().to_string().as_bytes());
        request.extend_from_slice(b"\r\n");
    }

    request.extend_from_slice(b"Connection: close\r\n");
    request.extend_from_slice(b"\r\n");

    if !body.is_empty() {
        request.extend_from_slice(body);
    }

    request
}

/// Methods for which a non-empty body is framed with `Content-Length`.
fn method_takes_body(method: &Method) -> bool {
    *method == Method::POST
        || *method == Method::PUT
        || *method == Method::PATCH
        || *method == Method::DELETE
}
