//! A sightseeing provider that queries the Tripadvisor tour search on RapidAPI.

use anyhow::Context;
use async_trait::async_trait;
use charlie_settings::UpstreamSettings;
use reqwest::{header::CONTENT_TYPE, Url};

use crate::{
    domain::body_to_json, SearchError, SetupError, SightseeingProvider, SightseeingRequest,
    UpstreamPayload,
};

/// Header carrying the RapidAPI subscription key.
const RAPIDAPI_KEY_HEADER: &str = "x-rapidapi-key";

/// Header naming the RapidAPI host being addressed.
const RAPIDAPI_HOST_HEADER: &str = "x-rapidapi-host";

/// A provider that asks RapidAPI for tours around a location.
pub struct RapidApiTourProvider {
    /// The HTTP client to query against the external provider.
    client: reqwest::Client,
    /// The tour search endpoint.
    endpoint: Url,
    /// Sent as `x-rapidapi-host`.
    host: String,
    /// Sent as `x-rapidapi-key`.
    api_key: String,
}

impl RapidApiTourProvider {
    /// Create a provider from settings.
    ///
    /// # Errors
    /// If the endpoint is not a valid URL, or the HTTP client cannot be built.
    pub fn new(settings: &UpstreamSettings) -> Result<Self, SetupError> {
        let endpoint = Url::parse(&settings.endpoint)
            .with_context(|| format!("Invalid upstream endpoint {:?}", settings.endpoint))
            .map_err(SetupError::InvalidConfiguration)?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .build()
            .context("Unable to create the Reqwest client")
            .map_err(SetupError::Network)?;

        if settings.api_key.is_empty() {
            tracing::warn!(
                r#type = "sightseeing.rapid-api.missing-key",
                "No upstream API key configured, requests will likely be rejected"
            );
        }

        Ok(Self {
            client,
            endpoint,
            host: settings.host.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl SightseeingProvider for RapidApiTourProvider {
    fn name(&self) -> String {
        "RapidApiTourProvider".to_owned()
    }

    async fn search(&self, request: &SightseeingRequest) -> Result<UpstreamPayload, SearchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("location", request.destination.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .header(RAPIDAPI_KEY_HEADER, &self.api_key)
            .header(RAPIDAPI_HOST_HEADER, &self.host)
            .send()
            .await
            .map_err(SearchError::Network)?;

        let status = response.status();
        let text = response.text().await.map_err(SearchError::Network)?;
        tracing::debug!(
            r#type = "sightseeing.rapid-api.response",
            status = status.as_u16(),
            body_length = text.len(),
            "Upstream responded"
        );

        if !status.is_success() {
            return Err(SearchError::Upstream {
                status: status.as_u16(),
                body: body_to_json(&text),
            });
        }

        Ok(UpstreamPayload::from_text(&text))
    }
}
