//! Response classification and the success/failure outcome type.
//!
//! # Design
//! `Classification::of` is a total function over status codes, so every
//! response lands in exactly one of three buckets. Only the first two carry
//! a payload: `Outcome` is a sum type, which makes "exactly one of success
//! and failure is populated" a structural fact instead of a convention to
//! check at runtime. Informational statuses never produce an `Outcome`;
//! `Outcome::from_response` rejects them with an error.

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::http::HttpResponse;

/// The three-way split of the status-code space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// 200 ≤ status < 300.
    Success,
    /// status ≥ 300.
    Failure,
    /// status < 200: informational responses and sub-100 garbage.
    Unclassified,
}

impl Classification {
    /// Classify a status code. Total: every `u16` maps to exactly one
    /// variant.
    pub fn of(status: u16) -> Classification {
        match status {
            200..=299 => Classification::Success,
            s if s >= 300 => Classification::Failure,
            _ => Classification::Unclassified,
        }
    }
}

/// The result of a dispatched request: the decoded success payload or the
/// decoded failure payload, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<S, F> {
    Success(S),
    Failure(F),
}

impl<S, F> Outcome<S, F> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// The success payload, if this is the success branch.
    pub fn success(self) -> Option<S> {
        match self {
            Outcome::Success(payload) => Some(payload),
            Outcome::Failure(_) => None,
        }
    }

    /// The failure payload, if this is the failure branch.
    pub fn failure(self) -> Option<F> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(payload) => Some(payload),
        }
    }
}

impl<S, F> Outcome<S, F>
where
    S: DeserializeOwned,
    F: DeserializeOwned,
{
    /// Interpret a delivered response: classify the status and deserialize
    /// the body as JSON into the matching variant.
    ///
    /// A failure-range status is the expected `Failure` branch, not an
    /// error. Errors are reserved for a body that does not decode and for
    /// informational statuses, which fit neither variant.
    pub fn from_response(response: &HttpResponse) -> Result<Self, Error> {
        match Classification::of(response.status) {
            Classification::Success => serde_json::from_str(&response.body)
                .map(Outcome::Success)
                .map_err(|e| Error::Decode(e.to_string())),
            Classification::Failure => serde_json::from_str(&response.body)
                .map(Outcome::Failure)
                .map_err(|e| Error::Decode(e.to_string())),
            Classification::Unclassified => Err(Error::UnclassifiedStatus(response.status)),
        }
    }
}
