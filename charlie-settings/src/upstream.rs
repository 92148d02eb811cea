//! Settings for the third-party sightseeing search API.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Connection details for the RapidAPI tour search endpoint.
#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// Full URL of the tour search endpoint. The destination is appended as
    /// the `location` query parameter.
    pub endpoint: String,

    /// Value of the `x-rapidapi-host` header.
    pub host: String,

    /// Value of the `x-rapidapi-key` header. Never serialized.
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Upper bound on a whole upstream request, including reading the body.
    #[serde_as(as = "DurationMilliSeconds")]
    #[serde(rename = "timeout_ms")]
    pub timeout: Duration,

    /// Upper bound on establishing the connection to the upstream.
    #[serde_as(as = "DurationMilliSeconds")]
    #[serde(rename = "connect_timeout_ms")]
    pub connect_timeout: Duration,
}
