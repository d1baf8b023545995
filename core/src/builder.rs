//! Fluent request builder and dispatcher.
//!
//! # Design
//! `RequestBuilder` accumulates a request spec through chained calls, then
//! turns it into one transport round-trip per dispatch operation. Host,
//! fixed headers, and query parameters are supplied at construction and
//! never change afterwards; path, method, and body are set by configuration
//! calls where the last write wins. Configuration methods consume and
//! return the builder, so a spec cannot be aliased mid-chain; dispatch
//! methods borrow it, so a finished spec can be sent more than once.
//!
//! The split between `build` (assemble the request as data) and the
//! dispatch operations (hand it to a [`Transport`] and interpret the
//! response) keeps everything up to the network edge deterministic and
//! testable without sockets.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse, Method, Transport};
use crate::outcome::{Classification, Outcome};
use crate::query::Query;

/// URL scheme for the assembled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scheme {
    Https,
    Http,
}

impl Scheme {
    fn as_str(self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

/// A request body plus the content type it should advertise, if any.
#[derive(Debug, Clone)]
struct Payload {
    content: String,
    content_type: Option<&'static str>,
}

/// Builder for a single HTTP request and its classified outcome.
///
/// Construct with a host, chain configuration calls, then call one of the
/// dispatch operations with a [`Transport`]. Each dispatch performs exactly
/// one round-trip.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    scheme: Scheme,
    host: String,
    path: String,
    method: Option<Method>,
    headers: Vec<(String, String)>,
    query: Query,
    body: Option<Payload>,
}

impl RequestBuilder {
    /// Request to `host` with no fixed headers and an empty query.
    ///
    /// Trailing slashes on the host are stripped; everything else is kept
    /// verbatim and checked at build time.
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_defaults(host, Vec::new(), Query::new())
    }

    /// Full form: `headers` and `query` are fixed for the lifetime of the
    /// builder and attached to every request it dispatches.
    pub fn with_defaults(
        host: impl Into<String>,
        headers: Vec<(String, String)>,
        query: Query,
    ) -> Self {
        let host = host.into();
        Self {
            scheme: Scheme::Https,
            host: host.trim_end_matches('/').to_string(),
            path: String::new(),
            method: None,
            headers,
            query,
            body: None,
        }
    }

    /// Switch the URL scheme from `https` (the default) to `http`.
    pub fn insecure(mut self) -> Self {
        self.scheme = Scheme::Http;
        self
    }

    /// Set the path component. Expected to begin with `/`; not normalized.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the request body to already-serialized content.
    ///
    /// The content is passed to the transport untouched and no content type
    /// is attached; serialization is the caller's business here.
    pub fn body(mut self, content: impl Into<String>) -> Self {
        self.body = Some(Payload {
            content: content.into(),
            content_type: None,
        });
        self
    }

    /// Serialize `value` as JSON and set it as the request body.
    ///
    /// A `content-type: application/json` header is attached at build time
    /// unless the fixed headers already carry a content type.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, Error> {
        let content = serde_json::to_string(value).map_err(|e| Error::Encode(e.to_string()))?;
        self.body = Some(Payload {
            content,
            content_type: Some("application/json"),
        });
        Ok(self)
    }

    /// Last selection wins; there is no default.
    fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Select GET.
    pub fn get(self) -> Self {
        self.method(Method::Get)
    }

    /// Select POST.
    pub fn post(self) -> Self {
        self.method(Method::Post)
    }

    /// Select PUT.
    pub fn put(self) -> Self {
        self.method(Method::Put)
    }

    /// Select PATCH.
    pub fn patch(self) -> Self {
        self.method(Method::Patch)
    }

    /// Select DELETE.
    pub fn delete(self) -> Self {
        self.method(Method::Delete)
    }

    /// Select HEAD.
    pub fn head(self) -> Self {
        self.method(Method::Head)
    }

    /// Select OPTIONS.
    pub fn options(self) -> Self {
        self.method(Method::Options)
    }

    /// Select TRACE.
    pub fn trace(self) -> Self {
        self.method(Method::Trace)
    }

    /// Select CONNECT.
    pub fn connect(self) -> Self {
        self.method(Method::Connect)
    }

    /// Assemble the accumulated spec into an [`HttpRequest`] without
    /// touching any transport.
    ///
    /// Fails with [`Error::MissingMethod`] if no method selector was called
    /// and with [`Error::InvalidHost`] if the host is empty or malformed,
    /// so a request that cannot be assembled is rejected before anything
    /// reaches the network.
    pub fn build(&self) -> Result<HttpRequest, Error> {
        self.check_host()?;
        let method = self.method.ok_or(Error::MissingMethod)?;

        let mut headers = self.headers.clone();
        if let Some(content_type) = self.body.as_ref().and_then(|payload| payload.content_type) {
            let has_content_type = headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case("content-type"));
            if !has_content_type {
                headers.push(("content-type".to_string(), content_type.to_string()));
            }
        }

        Ok(HttpRequest {
            method,
            url: self.assemble_url(),
            headers,
            body: self.body.as_ref().map(|payload| payload.content.clone()),
        })
    }

    /// Build the request and perform one transport round-trip, returning
    /// the raw response without classifying or decoding it.
    ///
    /// The escape hatch for responses that carry no JSON body, e.g. a 204.
    pub fn send(&self, transport: &dyn Transport) -> Result<HttpResponse, Error> {
        let request = self.build()?;
        transport.send(&request).map_err(Error::Transport)
    }

    /// Build, send, classify, and decode into an [`Outcome`].
    ///
    /// A failure-range status is the expected `Failure` branch, never an
    /// `Err`. Errors are reserved for configuration faults (raised before
    /// any transport call), transport faults, bodies that do not decode,
    /// and informational statuses.
    pub fn dispatch<S, F>(&self, transport: &dyn Transport) -> Result<Outcome<S, F>, Error>
    where
        S: DeserializeOwned,
        F: DeserializeOwned,
    {
        let response = self.send(transport)?;
        Outcome::from_response(&response)
    }

    /// Build and send; decode the body only when the status is in
    /// `[200, 300)`, otherwise `Ok(None)`.
    ///
    /// For call sites that only care about the happy path. Statuses outside
    /// the success range, failure and informational alike, answer `None`;
    /// a success-range body that does not decode is still an error.
    pub fn success_json<S>(&self, transport: &dyn Transport) -> Result<Option<S>, Error>
    where
        S: DeserializeOwned,
    {
        let response = self.send(transport)?;
        match Classification::of(response.status) {
            Classification::Success => serde_json::from_str(&response.body)
                .map(Some)
                .map_err(|e| Error::Decode(e.to_string())),
            _ => Ok(None),
        }
    }

    /// Build and send; decode the body only when the status is `>= 300`,
    /// otherwise `Ok(None)`.
    pub fn failure_json<F>(&self, transport: &dyn Transport) -> Result<Option<F>, Error>
    where
        F: DeserializeOwned,
    {
        let response = self.send(transport)?;
        match Classification::of(response.status) {
            Classification::Failure => serde_json::from_str(&response.body)
                .map(Some)
                .map_err(|e| Error::Decode(e.to_string())),
            _ => Ok(None),
        }
    }

    /// The host must be the sole authority of `scheme://host`: ports and
    /// IPv6 literals pass; embedded paths, queries, userinfo, or spaces do
    /// not.
    fn check_host(&self) -> Result<(), Error> {
        if self.host.is_empty() {
            return Err(Error::InvalidHost(self.host.clone()));
        }
        let base = format!("{}://{}", self.scheme.as_str(), self.host);
        let parsed = Url::parse(&base).map_err(|_| Error::InvalidHost(self.host.clone()))?;
        let plain_authority = parsed.host_str().is_some()
            && parsed.username().is_empty()
            && parsed.password().is_none()
            && parsed.path() == "/"
            && parsed.query().is_none()
            && parsed.fragment().is_none();
        if !plain_authority {
            return Err(Error::InvalidHost(self.host.clone()));
        }
        Ok(())
    }

    /// `scheme://host` + path, then `?` + rendered query only when the
    /// rendering is non-empty, so an empty query never leaves a trailing `?`.
    fn assemble_url(&self) -> String {
        let mut url = format!("{}://{}{}", self.scheme.as_str(), self.host, self.path);
        let rendered = self.query.render();
        if !rendered.is_empty() {
            url.push('?');
            url.push_str(&rendered);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde::Deserialize;

    use super::*;
    use crate::http::TransportError;

    /// Transport that answers every request with one canned response.
    struct Canned {
        status: u16,
        body: &'static str,
    }

    impl Transport for Canned {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse {
                status: self.status,
                body: self.body.to_string(),
            })
        }
    }

    /// Transport that must never be reached.
    struct Unreachable;

    impl Transport for Unreachable {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            panic!("transport called for a request that should fail during build");
        }
    }

    /// Transport that records what it is asked to send.
    struct Recording {
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Recording {
        fn new() -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Recording {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(HttpResponse {
                status: 200,
                body: "{}".to_string(),
            })
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        id: u64,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Fault {
        error: String,
    }

    #[test]
    fn assembles_url_with_query() {
        let mut query = Query::new();
        query.push("id", 42);
        let request = RequestBuilder::with_defaults("api.example.com", Vec::new(), query)
            .path("/v1/users")
            .get()
            .build()
            .unwrap();
        assert_eq!(request.url, "https://api.example.com/v1/users?id=42");
        assert_eq!(request.method, Method::Get);
    }

    #[test]
    fn assembles_url_without_query() {
        let request = RequestBuilder::new("example.com")
            .insecure()
            .path("/ping")
            .get()
            .build()
            .unwrap();
        assert_eq!(request.url, "http://example.com/ping");
    }

    #[test]
    fn empty_query_leaves_no_trailing_question_mark() {
        let mut query = Query::new();
        query.push("skipped", Option::<&str>::None);
        let request = RequestBuilder::with_defaults("example.com", Vec::new(), query)
            .path("/ping")
            .get()
            .build()
            .unwrap();
        assert_eq!(request.url, "https://example.com/ping");
    }

    #[test]
    fn scheme_defaults_to_https() {
        let request = RequestBuilder::new("example.com").get().build().unwrap();
        assert_eq!(request.url, "https://example.com");
    }

    #[test]
    fn trailing_slash_on_host_is_stripped() {
        let request = RequestBuilder::new("example.com/")
            .path("/ping")
            .get()
            .build()
            .unwrap();
        assert_eq!(request.url, "https://example.com/ping");
    }

    #[test]
    fn host_with_port_is_accepted() {
        let request = RequestBuilder::new("localhost:8080")
            .insecure()
            .path("/health")
            .get()
            .build()
            .unwrap();
        assert_eq!(request.url, "http://localhost:8080/health");
    }

    #[test]
    fn ipv6_literal_host_is_accepted() {
        let request = RequestBuilder::new("[::1]:8080")
            .insecure()
            .path("/health")
            .get()
            .build()
            .unwrap();
        assert_eq!(request.url, "http://[::1]:8080/health");
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = RequestBuilder::new("").get().build().unwrap_err();
        assert!(matches!(err, Error::InvalidHost(_)));
    }

    #[test]
    fn host_with_embedded_path_is_rejected() {
        let err = RequestBuilder::new("example.com/v1").get().build().unwrap_err();
        assert!(matches!(err, Error::InvalidHost(_)));
    }

    #[test]
    fn host_with_userinfo_is_rejected() {
        let err = RequestBuilder::new("user:secret@example.com")
            .get()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidHost(_)));
    }

    #[test]
    fn missing_method_fails_before_any_transport_call() {
        let err = RequestBuilder::new("example.com")
            .path("/v1/users")
            .dispatch::<serde_json::Value, serde_json::Value>(&Unreachable)
            .unwrap_err();
        assert!(matches!(err, Error::MissingMethod));
    }

    #[test]
    fn last_method_selection_wins() {
        let transport = Recording::new();
        RequestBuilder::new("example.com")
            .post()
            .get()
            .dispatch::<serde_json::Value, serde_json::Value>(&transport)
            .unwrap();
        let seen = transport.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::Get);
    }

    #[test]
    fn every_selector_maps_to_its_verb() {
        let base = RequestBuilder::new("example.com");
        let verb = |builder: RequestBuilder| {
            let method = builder.build().unwrap().method;
            (method, method.as_str())
        };
        assert_eq!(verb(base.clone().get()), (Method::Get, "GET"));
        assert_eq!(verb(base.clone().post()), (Method::Post, "POST"));
        assert_eq!(verb(base.clone().put()), (Method::Put, "PUT"));
        assert_eq!(verb(base.clone().patch()), (Method::Patch, "PATCH"));
        assert_eq!(verb(base.clone().delete()), (Method::Delete, "DELETE"));
        assert_eq!(verb(base.clone().head()), (Method::Head, "HEAD"));
        assert_eq!(verb(base.clone().options()), (Method::Options, "OPTIONS"));
        assert_eq!(verb(base.clone().trace()), (Method::Trace, "TRACE"));
        assert_eq!(verb(base.clone().connect()), (Method::Connect, "CONNECT"));
    }

    #[test]
    fn fixed_headers_travel_with_the_request() {
        let headers = vec![("x-api-key".to_string(), "sesame".to_string())];
        let request = RequestBuilder::with_defaults("example.com", headers, Query::new())
            .get()
            .build()
            .unwrap();
        assert_eq!(
            request.headers,
            vec![("x-api-key".to_string(), "sesame".to_string())]
        );
    }

    #[test]
    fn json_body_adds_content_type() {
        let request = RequestBuilder::new("example.com")
            .post()
            .json(&serde_json::json!({"name": "Ada"}))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(request.body.as_deref(), Some(r#"{"name":"Ada"}"#));
        assert_eq!(
            request.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn json_body_respects_existing_content_type() {
        let headers = vec![("Content-Type".to_string(), "application/vnd.api+json".to_string())];
        let request = RequestBuilder::with_defaults("example.com", headers, Query::new())
            .post()
            .json(&serde_json::json!({}))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers,
            vec![(
                "Content-Type".to_string(),
                "application/vnd.api+json".to_string()
            )]
        );
    }

    #[test]
    fn raw_body_attaches_no_content_type() {
        let request = RequestBuilder::new("example.com")
            .put()
            .body("already serialized")
            .build()
            .unwrap();
        assert_eq!(request.body.as_deref(), Some("already serialized"));
        assert!(request.headers.is_empty());
    }

    #[test]
    fn dispatch_decodes_success_payload() {
        let transport = Canned {
            status: 200,
            body: r#"{"id":1}"#,
        };
        let outcome: Outcome<Widget, Fault> = RequestBuilder::new("example.com")
            .path("/widgets/1")
            .get()
            .dispatch(&transport)
            .unwrap();
        assert_eq!(outcome, Outcome::Success(Widget { id: 1 }));
    }

    #[test]
    fn dispatch_decodes_failure_payload() {
        let transport = Canned {
            status: 404,
            body: r#"{"error":"not found"}"#,
        };
        let outcome: Outcome<Widget, Fault> = RequestBuilder::new("example.com")
            .path("/widgets/1")
            .get()
            .dispatch(&transport)
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Failure(Fault {
                error: "not found".to_string()
            })
        );
    }

    #[test]
    fn dispatch_rejects_informational_status() {
        let transport = Canned {
            status: 100,
            body: "",
        };
        let err = RequestBuilder::new("example.com")
            .get()
            .dispatch::<Widget, Fault>(&transport)
            .unwrap_err();
        assert!(matches!(err, Error::UnclassifiedStatus(100)));
    }

    #[test]
    fn dispatch_surfaces_decode_error() {
        let transport = Canned {
            status: 200,
            body: "<html>not json</html>",
        };
        let err = RequestBuilder::new("example.com")
            .get()
            .dispatch::<Widget, Fault>(&transport)
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn success_json_is_none_outside_success_range() {
        let transport = Canned {
            status: 500,
            body: r#"{"error":"boom"}"#,
        };
        let payload: Option<Widget> = RequestBuilder::new("example.com")
            .get()
            .success_json(&transport)
            .unwrap();
        assert!(payload.is_none());
    }

    #[test]
    fn failure_json_is_none_inside_success_range() {
        let transport = Canned {
            status: 200,
            body: r#"{"id":7}"#,
        };
        let payload: Option<Fault> = RequestBuilder::new("example.com")
            .get()
            .failure_json(&transport)
            .unwrap();
        assert!(payload.is_none());
    }

    #[test]
    fn option_operations_answer_none_for_informational() {
        let transport = Canned { status: 100, body: "" };
        let builder = RequestBuilder::new("example.com").get();
        assert!(builder.success_json::<Widget>(&transport).unwrap().is_none());
        assert!(builder.failure_json::<Fault>(&transport).unwrap().is_none());
    }

    #[test]
    fn builder_can_dispatch_repeatedly() {
        let transport = Recording::new();
        let builder = RequestBuilder::new("example.com").path("/again").get();
        builder
            .dispatch::<serde_json::Value, serde_json::Value>(&transport)
            .unwrap();
        builder
            .dispatch::<serde_json::Value, serde_json::Value>(&transport)
            .unwrap();
        assert_eq!(transport.seen.borrow().len(), 2);
    }

    #[test]
    fn transport_fault_propagates() {
        struct Refused;
        impl Transport for Refused {
            fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
                Err("connection refused".into())
            }
        }
        let err = RequestBuilder::new("example.com")
            .get()
            .dispatch::<Widget, Fault>(&Refused)
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(
            err.to_string(),
            "transport failed: connection refused"
        );
    }
}
