#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! # Charlie Settings
//!
//! Configuration is specified in several ways, with later methods overriding earlier ones.
//!
//! 1. A base configuration checked into the repository, in `config/base.yaml`.
//!    This provides the default values for most settings.
//! 2. Per-environment configuration files in the `config` directory. The
//!    environment is selected using the environment variable `CHARLIE_ENV`. The
//!    settings for that environment are then loaded from `config/${env}.yaml`, if
//!    it exists. The default environment is "development". A "production"
//!    environment is also provided.
//! 3. A local configuration file not checked into the repository, at
//!    `config/local.yaml`. This file is in `.gitignore` and is safe to use for
//!    local configuration and secrets if desired.
//! 4. Environment variables that begin with `CHARLIE_` and have a separator for
//!    `__`. For example, `Settings::http::workers` can be controlled from the
//!    environment variable `CHARLIE_HTTP__WORKERS`.
//! 5. If no upstream API key was configured by any of the above, the
//!    environment variable `TOUR_API_KEY` is used.
//!
//! Tests should use `Settings::load_for_tests` which only reads from
//! `config/base.yaml`, `config/test.yaml`, and `config/local_test.yaml` (if it
//! exists). It does not read from environment variables.
//!
//! Configuration files are canonically YAML files. However, any format supported
//! by the [config] crate can be used, including JSON and TOML. To choose another
//! format, simply use a different extension for your file, like
//! `config/local.toml`.

mod logging;
pub mod sightseeing;
pub mod upstream;

pub use logging::{DirectiveWrapper, LogFormat, LoggingSettings};
pub use sightseeing::{ListingSettings, SightseeingSettings};
pub use upstream::UpstreamSettings;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Environment variable the upstream API key was historically deployed with.
const LEGACY_API_KEY_VAR: &str = "TOUR_API_KEY";

/// Top level settings object for Charlie.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[doc(inline)]
pub struct Settings {
    /// The environment Charlie is running in. Should only be set with the
    /// `CHARLIE_ENV` environment variable.
    pub env: String,

    /// Enable additional features to debug the application. This should not be
    /// set to true in production environments.
    pub debug: bool,

    /// URL to redirect to from the root of the service. If unset, the root
    /// serves a short description instead.
    pub public_documentation: Option<String>,

    /// Include the requested destination in request logs. Destinations are
    /// free text typed by users, so this is off outside of development.
    pub log_full_request: bool,

    /// How the service introduces itself in responses.
    pub agent: AgentSettings,

    /// Settings for the HTTP server.
    pub http: HttpSettings,

    /// Logging settings.
    pub logging: LoggingSettings,

    /// Metrics settings.
    pub metrics: MetricsSettings,

    /// Connection to the third-party sightseeing search API.
    pub upstream: UpstreamSettings,

    /// Post-processing applied to each sightseeing listing.
    pub sightseeing: SightseeingSettings,
}

/// Identity of the agent answering requests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Reported as `agent` in sightseeing responses and as `server` in the
    /// health check.
    pub name: String,
}

/// Settings for the HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpSettings {
    /// The host and port to listen on, such as "127.0.0.1:8003" or "0.0.0.0:80".
    pub listen: SocketAddr,

    /// The number of workers to use. Optional. If no value is provided, the
    /// number of logical cores will be used.
    pub workers: Option<usize>,
}

/// Settings for the StatsD metrics sink.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// The host to send metrics to.
    pub sink_host: String,

    /// The UDP port to send metrics to.
    pub sink_port: u16,
}

impl Settings {
    /// Load settings from configuration files and environment variables.
    ///
    /// # Errors
    /// If any of the configured values are invalid, or if any of the required
    /// configuration files are missing.
    pub fn load() -> Result<Self, ConfigError> {
        let mut s = Config::new();

        // Start off with the base config.
        s.merge(File::with_name("./config/base"))?;

        // Merge in an environment specific config.
        let charlie_env =
            std::env::var("CHARLIE_ENV").unwrap_or_else(|_| "development".to_string());
        s.set("env", charlie_env.as_str())?;
        s.merge(File::with_name(&format!("config/{}", s.get::<String>("env")?)).required(false))?;

        // Add a local configuration file that is `.gitignore`ed.
        s.merge(File::with_name("config/local").required(false))?;

        // Add environment variables that start with "CHARLIE_" and have "__" to
        // separate levels. For example, `CHARLIE_HTTP__LISTEN` maps to
        // `Settings::http::listen`.
        s.merge(Environment::with_prefix("CHARLIE").separator("__"))?;

        let mut settings: Self = s.try_into()?;
        settings.fill_api_key(std::env::var(LEGACY_API_KEY_VAR).ok());
        Ok(settings)
    }

    /// Load settings from configuration files for tests.
    ///
    /// `changer` is applied to the loaded settings before they are returned.
    ///
    /// # Panics
    /// If the test configuration files are missing or invalid.
    pub fn load_for_tests<F: FnOnce(&mut Self)>(changer: F) -> Self {
        let mut s = Config::new();

        // Start off with the base config.
        s.merge(File::with_name("../config/base"))
            .expect("Could not load base settings");

        // Merge in test specific config.
        s.set("env", "test").expect("Could not set env for tests");
        s.merge(File::with_name("../config/test"))
            .expect("Could not load test settings");

        // Add a local configuration file that is `.gitignore`ed.
        s.merge(File::with_name("../config/local_test").required(false))
            .expect("Could not load local settings for tests");

        let mut settings: Self = s.try_into().expect("Could not convert settings");
        changer(&mut settings);
        settings
    }

    /// Use `fallback` as the upstream API key if none was configured.
    pub fn fill_api_key(&mut self, fallback: Option<String>) {
        if self.upstream.api_key.is_empty() {
            if let Some(key) = fallback.filter(|key| !key.is_empty()) {
                self.upstream.api_key = key;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_settings_load() {
        let settings = Settings::load_for_tests(|_| ());
        assert_eq!(settings.env, "test");
        assert_eq!(settings.agent.name, "Charlie");
        assert!(settings.sightseeing.top.rank);
        assert_eq!(settings.sightseeing.top.limit, Some(4));
        assert!(!settings.sightseeing.all.rank);
        assert_eq!(settings.sightseeing.all.limit, None);
    }

    #[test]
    fn test_changer_is_applied() {
        let settings = Settings::load_for_tests(|s| s.agent.name = "Delta".to_string());
        assert_eq!(settings.agent.name, "Delta");
    }

    #[test]
    fn test_fill_api_key_only_when_missing() {
        let mut settings = Settings::load_for_tests(|s| s.upstream.api_key = String::new());
        settings.fill_api_key(Some("from-env".to_string()));
        assert_eq!(settings.upstream.api_key, "from-env");

        settings.fill_api_key(Some("other".to_string()));
        assert_eq!(settings.upstream.api_key, "from-env");
    }

    #[test]
    fn test_fill_api_key_ignores_empty_fallback() {
        let mut settings = Settings::load_for_tests(|s| s.upstream.api_key = String::new());
        settings.fill_api_key(Some(String::new()));
        assert_eq!(settings.upstream.api_key, "");
        settings.fill_api_key(None);
        assert_eq!(settings.upstream.api_key, "");
    }

    #[test]
    fn test_api_key_is_not_serialized() {
        let settings = Settings::load_for_tests(|s| s.upstream.api_key = "secret".to_string());
        let value = serde_json::to_value(&settings).expect("settings should serialize");
        assert!(value["upstream"].get("api_key").is_none());
        assert!(!value.to_string().contains("secret"));
    }
}
