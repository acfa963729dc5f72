//! HTTP response parsing and accessors.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::headers::Headers;

/// A parsed HTTP response.
#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub headers: Headers,
    body: Bytes,
    http_version: String,
}

impl Response {
    /// Parse raw response bytes into status line, headers, and body.
    ///
    /// The body is everything after the `\r\n\r\n` delimiter, verbatim.
    /// Header values are trimmed of surrounding spaces and tabs; header
    /// lines without a colon are skipped.
    pub fn parse(raw: &[u8]) -> Result<Response> {
        let header_end = find_header_end(raw)
            .ok_or_else(|| Error::parse("no header/body delimiter in response"))?;

        let head = &raw[..header_end - 4];
        let body = Bytes::copy_from_slice(&raw[header_end..]);

        // Lossy is fine here: the status line and header names we care
        // about are ASCII, and values are carried through as text.
        let head = String::from_utf8_lossy(head);
        let mut lines = head.split("\r\n");

        let status_line = lines
            .next()
            .ok_or_else(|| Error::parse("empty response head"))?;
        let (http_version, status) = parse_status_line(status_line)?;

        let mut headers = Headers::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            // Malformed header lines (no colon) are skipped.
            if let Some((name, value)) = line.split_once(':') {
                headers.append(name, value.trim_matches([' ', '\t']));
            }
        }

        Ok(Response {
            status,
            headers,
            body,
            http_version,
        })
    }

    /// HTTP version token from the status line (e.g. `HTTP/1.1`).
    pub fn http_version(&self) -> &str {
        &self.http_version
    }

    /// Response body, verbatim.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume the response, returning the body.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the status is 3xx.
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Whether the status is 4xx.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Whether the status is 5xx.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Convert a non-2xx response into [`Error::Status`], passing 2xx
    /// responses through. Opt-in; `send()` itself never fails on status.
    pub fn error_for_status(self) -> Result<Response> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Status {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Find the position just past the `\r\n\r\n` header/body delimiter.
fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| i + 4)
}

/// Split `HTTP/<version> <status> [<reason>]` into version and status.
fn parse_status_line(line: &str) -> Result<(String, u16)> {
    let mut parts = line.split_ascii_whitespace();
    let version = parts
        .next()
        .filter(|v| v.starts_with("HTTP/"))
        .ok_or_else(|| Error::parse(format!("invalid status line: {:?}", line)))?;
    let status = parts
        .next()
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| Error::parse(format!("invalid status code in: {:?}", line)))?;
    Ok((version.to_string(), status))
}
