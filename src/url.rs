//! Minimal URL decomposition for `http`/`https` targets.
//!
//! Accepts exactly `scheme://host[:port][/path]`. No percent-decoding or
//! query-string awareness; everything from the first `/` after the
//! authority onward is carried through verbatim as the request path.

use std::fmt;

use crate::error::{Error, Result};

/// URL scheme, restricted to the two this client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Default port for the scheme.
    pub fn default_port(self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    /// Whether this scheme requires a TLS transport.
    pub fn is_tls(self) -> bool {
        matches!(self, Scheme::Https)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => f.write_str("http"),
            Scheme::Https => f.write_str("https"),
        }
    }
}

/// A URL decomposed into the parts the transport needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    /// Always starts with `/`.
    pub path: String,
}

impl ParsedUrl {
    /// Parse a URL of the form `(http|https)://host[:port][/path]`.
    ///
    /// The scheme is matched case-insensitively. Port defaults to 80/443,
    /// path defaults to `/`.
    pub fn parse(url: &str) -> Result<ParsedUrl> {
        if url.is_empty() {
            return Err(Error::url("empty URL"));
        }

        let (scheme, rest) = split_scheme(url)?;

        // Authority runs to the first '/', the remainder is the path.
        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, "/"),
        };

        if authority.is_empty() {
            return Err(Error::url(format!("missing host in URL: {}", url)));
        }

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port_str)) => {
                if host.is_empty() {
                    return Err(Error::url(format!("missing host in URL: {}", url)));
                }
                let port = port_str
                    .parse::<u16>()
                    .map_err(|_| Error::url(format!("invalid port in URL: {}", url)))?;
                (host, port)
            }
            None => (authority, scheme.default_port()),
        };

        if host.contains(':') {
            return Err(Error::url(format!("invalid host in URL: {}", url)));
        }

        Ok(ParsedUrl {
            scheme,
            host: host.to_string(),
            port,
            path: path.to_string(),
        })
    }

    /// Whether the transport for this URL is TLS.
    pub fn is_tls(&self) -> bool {
        self.scheme.is_tls()
    }

    /// Whether the port differs from the scheme's default.
    pub fn has_explicit_port(&self) -> bool {
        self.port != self.scheme.default_port()
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_explicit_port() {
            write!(f, "{}://{}:{}{}", self.scheme, self.host, self.port, self.path)
        } else {
            write!(f, "{}://{}{}", self.scheme, self.host, self.path)
        }
    }
}

/// Split off the scheme, matching it case-insensitively.
fn split_scheme(url: &str) -> Result<(Scheme, &str)> {
    let idx = url
        .find("://")
        .ok_or_else(|| Error::url(format!("invalid URL format: {}", url)))?;
    let scheme = &url[..idx];
    let rest = &url[idx + 3..];

    if scheme.eq_ignore_ascii_case("http") {
        Ok((Scheme::Http, rest))
    } else if scheme.eq_ignore_ascii_case("https") {
        Ok((Scheme::Https, rest))
    } else {
        Err(Error::url(format!("unsupported scheme: {}", scheme)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_with_path() {
        let url = ParsedUrl::parse("http://example.com/a/b").unwrap();
        assert_eq!(url.scheme, Scheme::Http);
        assert_eq!(url.host, "example.com");
        assert_eq!(url.port, 80);
        assert_eq!(url.path, "/a/b");
        assert!(!url.is_tls());
    }

    #[test]
    fn test_parse_https_with_port() {
        let url = ParsedUrl::parse("https://example.com:8443").unwrap();
        assert_eq!(url.scheme, Scheme::Https);
        assert_eq!(url.host, "example.com");
        assert_eq!(url.port, 8443);
        assert_eq!(url.path, "/");
        assert!(url.is_tls());
    }

    #[test]
    fn test_parse_scheme_case_insensitive() {
        let url = ParsedUrl::parse("HTTPS://example.com").unwrap();
        assert_eq!(url.scheme, Scheme::Https);
        assert_eq!(url.port, 443);
    }

    #[test]
    fn test_parse_query_carried_verbatim() {
        let url = ParsedUrl::parse("http://example.com/search?q=a%20b&x=1").unwrap();
        assert_eq!(url.path, "/search?q=a%20b&x=1");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(ParsedUrl::parse("not-a-url"), Err(Error::Url(_))));
        assert!(matches!(ParsedUrl::parse(""), Err(Error::Url(_))));
        assert!(matches!(ParsedUrl::parse("ftp://example.com"), Err(Error::Url(_))));
        assert!(matches!(ParsedUrl::parse("http://"), Err(Error::Url(_))));
        assert!(matches!(ParsedUrl::parse("http://:8080/x"), Err(Error::Url(_))));
        assert!(matches!(
            ParsedUrl::parse("http://example.com:notaport/"),
            Err(Error::Url(_))
        ));
        assert!(matches!(
            ParsedUrl::parse("http://example.com:99999/"),
            Err(Error::Url(_))
        ));
    }

    #[test]
    fn test_explicit_default_port_is_not_explicit() {
        let url = ParsedUrl::parse("http://example.com:80/x").unwrap();
        assert_eq!(url.port, 80);
        assert!(!url.has_explicit_port());

        let url = ParsedUrl::parse("http://example.com:8080/x").unwrap();
        assert!(url.has_explicit_port());
    }

    #[test]
    fn test_display_round_trip() {
        let url = ParsedUrl::parse("https://example.com:8443/a").unwrap();
        assert_eq!(url.to_string(), "https://example.com:8443/a");

        let url = ParsedUrl::parse("http://example.com").unwrap();
        assert_eq!(url.to_string(), "http://example.com/");
    }
}
