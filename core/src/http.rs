//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate assembles `HttpRequest` values and interprets `HttpResponse` values
//! without ever touching the network; the actual round-trip belongs to a
//! [`Transport`] implementation supplied by the caller. This separation keeps
//! the core deterministic and easy to test against canned responses.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved across
//! threads or stored without lifetime concerns.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    Connect,
}

impl Method {
    /// The verb token as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Produced by `RequestBuilder::build`. The URL is fully assembled, including
/// scheme, host, path, and the rendered query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by a [`Transport`] after executing an [`HttpRequest`]. The
/// core only consumes the status code and the body; anything else the
/// transport learned about the response stays with the transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Error type carried back from a [`Transport`]: whatever the underlying
/// HTTP library reports, boxed and otherwise untouched.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// The single seam between this crate and an actual HTTP library.
///
/// Implementations perform exactly one network round-trip per call and
/// return the response as data. A failure-range status code (4xx, 5xx) is a
/// valid response, not an error: implementations built on libraries that
/// turn such statuses into errors (ureq does by default) must disable that
/// behavior. `Err` is reserved for faults below the HTTP layer: DNS,
/// connection refused, TLS, timeouts the transport itself enforces.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
