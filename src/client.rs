//! Blocking HTTP client and redirect handling.

use bytes::Bytes;
use http::Method;
use tokio::runtime;

use crate::config::RequestConfig;
use crate::error::{Error, Result};
use crate::headers::Headers;
use crate::request::build_request;
use crate::response::Response;
use crate::transport::{self, TlsContext};
use crate::url::ParsedUrl;

/// Synchronous HTTP/1.1 client.
///
/// Each client owns a current-thread I/O driver and a TLS context, and
/// serves one call at a time; `send()` blocks until the request (including
/// any redirect hops) completes or fails. For concurrent use, give each
/// thread its own client.
pub struct Client {
    runtime: runtime::Runtime,
    tls: TlsContext,
}

impl Client {
    /// Create a client with a fresh I/O driver and TLS context.
    pub fn new() -> Result<Client> {
        let runtime = runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
            .map_err(|e| Error::network_io("failed to build I/O driver", e))?;
        Ok(Client {
            runtime,
            tls: TlsContext::new()?,
        })
    }

    /// Start a request with an explicit method.
    pub fn request(&mut self, method: Method, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder {
            client: self,
            method,
            url: url.into(),
            headers: Headers::new(),
            body: Bytes::new(),
            config: RequestConfig::default(),
        }
    }

    /// Start a GET request.
    pub fn get(&mut self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::GET, url)
    }

    /// Start a POST request.
    pub fn post(&mut self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::POST, url)
    }

    /// Start a PUT request.
    pub fn put(&mut self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::PUT, url)
    }

    /// Start a DELETE request.
    pub fn delete(&mut self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::DELETE, url)
    }

    /// Start a PATCH request.
    pub fn patch(&mut self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::PATCH, url)
    }

    /// Start a HEAD request.
    pub fn head(&mut self, url: impl Into<String>) -> RequestBuilder<'_> {
        self.request(Method::HEAD, url)
    }

    fn execute(
        &mut self,
        method: Method,
        url: String,
        headers: Headers,
        body: Bytes,
        config: RequestConfig,
    ) -> Result<Response> {
        let Client { runtime, tls } = self;
        runtime.block_on(execute_async(tls, method, url, headers, body, config))
    }
}

/// Builder for a single request.
pub struct RequestBuilder<'a> {
    client: &'a mut Client,
    method: Method,
    url: String,
    headers: Headers,
    body: Bytes,
    config: RequestConfig,
}

impl RequestBuilder<'_> {
    /// Add a header. Headers are written in the order they were added.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replace all headers.
    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Replace the default configuration for this request.
    pub fn config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    /// Send the request, blocking until the response is complete.
    ///
    /// Returns the response for any status code; use
    /// [`Response::error_for_status`] to treat non-2xx as failure.
    pub fn send(self) -> Result<Response> {
        self.client
            .execute(self.method, self.url, self.headers, self.body, self.config)
    }
}

/// One attempt per loop iteration; a redirect status with a `Location`
/// header re-enters the loop with the new URL and the same method, headers,
/// and body (303 included).
async fn execute_async(
    tls: &mut TlsContext,
    method: Method,
    mut url: String,
    headers: Headers,
    body: Bytes,
    config: RequestConfig,
) -> Result<Response> {
    let mut hops = 0u32;
    loop {
        let parsed = ParsedUrl::parse(&url)?;
        let request = build_request(&method, &parsed, &headers, &body);
        let raw = transport::send(&parsed, &request, &config, tls).await?;
        let response = Response::parse(&raw)?;

        if !config.follow_redirects || !is_redirect_status(response.status) {
            return Ok(response);
        }
        let location = match response.header("Location") {
            Some(location) if !location.is_empty() => location.to_string(),
            _ => return Ok(response),
        };

        hops += 1;
        if hops > config.max_redirects {
            return Err(Error::network(format!(
                "too many redirects (max: {})",
                config.max_redirects
            )));
        }
        tracing::debug!(
            status = response.status,
            location = %location,
            hop = hops,
            "following redirect"
        );
        url = location;
    }
}

/// Statuses that trigger a redirect when a `Location` header is present.
fn is_redirect_status(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}
