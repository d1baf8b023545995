//! Fluent HTTP request construction with classified outcomes.
//!
//! Build a request spec through chained calls, hand it to a [`Transport`],
//! and get the response decoded into either a success or a failure payload
//! depending on its status range.
//!
//! # Design
//! - The library never opens a socket. [`RequestBuilder::build`] produces a
//!   plain [`HttpRequest`]; the host supplies the I/O behind the
//!   [`Transport`] trait and hands back a plain [`HttpResponse`].
//! - One dispatch call, one round-trip. Redirects, retries, and pooling
//!   belong to the transport, not to this crate.
//! - A failure-range status is data, not an error: [`dispatch`] returns it
//!   as [`Outcome::Failure`] with a decoded body. `Err` is reserved for
//!   specs that cannot be assembled, transport faults, undecodable bodies,
//!   and statuses outside both ranges.
//!
//! [`dispatch`]: RequestBuilder::dispatch

pub mod builder;
pub mod error;
pub mod http;
pub mod outcome;
pub mod query;

pub use builder::RequestBuilder;
pub use error::Error;
pub use http::{HttpRequest, HttpResponse, Method, Transport, TransportError};
pub use outcome::{Classification, Outcome};
pub use query::{Query, QueryValue};
