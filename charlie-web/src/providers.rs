//! Tools to manage the sightseeing provider.

use std::sync::Arc;

use anyhow::{Context, Result};
use charlie_settings::Settings;
use charlie_sightseeing::{RapidApiTourProvider, SightseeingProvider};

/// The SightseeingProvider stored in Actix's app_data.
#[derive(Clone)]
pub struct SightseeingProviderRef(pub Arc<dyn SightseeingProvider>);

impl SightseeingProviderRef {
    /// Initialize the sightseeing provider described by `settings`.
    ///
    /// # Errors
    /// If the provider cannot be set up with the configured values.
    pub fn init(settings: &Settings) -> Result<Self> {
        let _setup_span = tracing::info_span!("sightseeing_provider_setup").entered();
        tracing::info!(
            r#type = "web.configuring-provider",
            "Setting up sightseeing provider"
        );

        let provider = RapidApiTourProvider::new(&settings.upstream)
            .context("Setting up the RapidAPI tour provider")?;
        Ok(Self::new(provider))
    }

    /// Wrap an already built provider.
    pub fn new<P: SightseeingProvider + 'static>(provider: P) -> Self {
        Self(Arc::new(provider))
    }
}

impl std::ops::Deref for SightseeingProviderRef {
    type Target = dyn SightseeingProvider;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
