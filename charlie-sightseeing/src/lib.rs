#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Sightseeing search for Charlie.
//!
//! Tours come from a third-party search API through a [`SightseeingProvider`].
//! The raw records it returns have no guaranteed shape, so they are passed
//! through [`normalize`] which fills in defaults, renames fields, and
//! optionally ranks and truncates the list.

mod domain;
mod normalize;
pub mod providers;

pub use crate::domain::{is_truthy, NormalizedTour, RawTourRecord, TourPrice, UpstreamPayload};
pub use crate::normalize::{normalize, NormalizeOptions};
pub use crate::providers::RapidApiTourProvider;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// A request for sightseeing tours around a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SightseeingRequest {
    /// Free text describing where the user is going, such as "Paris".
    pub destination: String,
}

impl SightseeingRequest {
    /// Create a request for `destination`.
    pub fn new<S: Into<String>>(destination: S) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

/// A source of raw tour records.
#[async_trait]
pub trait SightseeingProvider: Send + Sync {
    /// An operator-visible name for this provider.
    fn name(&self) -> String;

    /// Search for tours around the requested destination.
    ///
    /// A response that does not contain a list of tours is not an error. It is
    /// returned as [`UpstreamPayload::Unrecognized`] so that callers can report
    /// it along with the body the provider sent.
    async fn search(&self, request: &SightseeingRequest) -> Result<UpstreamPayload, SearchError>;
}

/// Errors that may occur when setting up a provider.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The provider cannot be used with the current configuration.
    #[error("This sightseeing provider cannot be used with the current configuration")]
    InvalidConfiguration(#[source] anyhow::Error),

    /// The HTTP client for the provider could not be built.
    #[error("There was a network error while setting up this sightseeing provider")]
    Network(#[source] anyhow::Error),
}

/// Errors that may occur while searching for tours.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The provider could not be reached, or the connection failed midway.
    #[error("{0}")]
    Network(#[source] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Upstream {
        /// The HTTP status the provider answered with.
        status: u16,
        /// The body the provider sent, as JSON when possible.
        body: Value,
    },
}

impl SearchError {
    /// The body sent by the provider along with the error, if there was one.
    pub fn upstream_body(&self) -> Option<&Value> {
        match self {
            Self::Network(_) => None,
            Self::Upstream { body, .. } => Some(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SearchError;
    use serde_json::json;

    #[test]
    fn upstream_errors_carry_the_body() {
        let error = SearchError::Upstream {
            status: 403,
            body: json!({"message": "You are not subscribed to this API."}),
        };
        assert_eq!(error.to_string(), "Request failed with status code 403");
        assert_eq!(
            error.upstream_body(),
            Some(&json!({"message": "You are not subscribed to this API."}))
        );
    }
}
