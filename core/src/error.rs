//! Error types for the request builder and dispatcher.
//!
//! # Design
//! Configuration faults (`MissingMethod`, `InvalidHost`) are caught by
//! `build()` before any transport call is made. A response whose status is
//! in the failure range is *not* an error; it is the `Failure` branch of an
//! `Outcome`. The variants here cover only what prevents an outcome from
//! existing at all: a request that cannot be assembled, a transport that
//! could not deliver it, a body that was not the JSON it claimed to be, or a
//! status the success/failure split does not cover.

use std::fmt;

use crate::http::TransportError;

/// Errors returned by `RequestBuilder` dispatch operations.
#[derive(Debug)]
pub enum Error {
    /// Dispatch was attempted before any method selector was called.
    MissingMethod,

    /// The host is empty or does not form a valid URL authority.
    InvalidHost(String),

    /// The transport failed below the HTTP layer (DNS, connection, TLS).
    /// The underlying library's own error is carried unchanged.
    Transport(TransportError),

    /// The request payload could not be serialized to JSON.
    Encode(String),

    /// The response body could not be deserialized into the expected type.
    Decode(String),

    /// The response status is informational (below 200) and maps to neither
    /// the success nor the failure outcome.
    UnclassifiedStatus(u16),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingMethod => write!(f, "no HTTP method selected"),
            Error::InvalidHost(host) => write!(f, "invalid host: {host:?}"),
            Error::Transport(err) => write!(f, "transport failed: {err}"),
            Error::Encode(msg) => write!(f, "serialization failed: {msg}"),
            Error::Decode(msg) => write!(f, "deserialization failed: {msg}"),
            Error::UnclassifiedStatus(status) => {
                write!(f, "status {status} is neither success nor failure")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
