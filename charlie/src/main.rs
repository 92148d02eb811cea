// Only overview documentation that is not relevant to one of the more specific
// crates should go here.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! A web API relaying sightseeing searches to a third-party tour provider.
//!
//! Charlie is split into several subcrates that work in collaboration.
//!
//! - [charlie-settings](../charlie_settings/index.html)
//! - [charlie-sightseeing](../charlie_sightseeing/index.html)
//! - [charlie-web](../charlie_web/index.html)
//! - [charlie-integration-tests](../charlie_integration_tests/index.html)

mod docs;

use anyhow::{Context, Result};
use cadence::{BufferedUdpMetricSink, QueuingMetricSink, StatsdClient};
use charlie_settings::{LogFormat, Settings};
use std::net::{TcpListener, UdpSocket};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

/// Primary entry point
#[actix_rt::main]
async fn main() -> Result<()> {
    let settings = Settings::load().context("Loading settings")?;
    init_logging(&settings).context("Initializing logging")?;
    let metrics_client = init_metrics(&settings).context("Initializing metrics")?;
    let listener = TcpListener::bind(settings.http.listen).context("Binding port")?;

    tracing::info!(
        r#type = "charlie.starting",
        listen = %settings.http.listen,
        env = %settings.env,
        "Starting Charlie"
    );

    charlie_web::run(listener, metrics_client, settings)
        .context("Starting charlie-web server")?
        .await
        .context("Running charlie-web server")?;

    Ok(())
}

/// Set up logging for Charlie, based on settings and the `RUST_LOG` environment variable.
fn init_logging(settings: &Settings) -> Result<()> {
    LogTracer::init()?;
    let env_filter: EnvFilter = (&settings.logging.levels).into();
    let registry = tracing_subscriber::registry().with(env_filter);

    match settings.logging.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().pretty()),
        )?,
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true),
            ),
        )?,
        LogFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(tracing_subscriber::fmt::layer().compact()),
        )?,
    }

    Ok(())
}

/// Set up a StatsD client that sends metrics to the configured sink without
/// blocking request handling.
fn init_metrics(settings: &Settings) -> Result<StatsdClient> {
    let socket = UdpSocket::bind("0.0.0.0:0").context("Binding metrics socket")?;
    socket.set_nonblocking(true)?;

    let sink_address = (settings.metrics.sink_host.as_str(), settings.metrics.sink_port);
    let sink = BufferedUdpMetricSink::from(sink_address, socket)
        .context("Connecting to the metrics sink")?;
    let queuing_sink = QueuingMetricSink::from(sink);

    Ok(StatsdClient::builder("charlie", queuing_sink)
        .with_error_handler(|error| {
            tracing::warn!(r#type = "charlie.metrics.error", %error, "Could not send metric");
        })
        .build())
}
