#![warn(missing_docs, clippy::missing_docs_in_private_items)]

//! Web server for [Charlie](../charlie/index.html)'s public API.

mod debug;
mod errors;
mod extractors;
mod health;
mod logging;
mod middleware;
mod providers;
mod sightseeing;

pub use crate::providers::SightseeingProviderRef;

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    get,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use anyhow::{Context, Result};
use cadence::StatsdClient;
use charlie_settings::Settings;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::{health::ServerStart, logging::CharlieRootSpanBuilder};

/// Run the web server
///
/// The returned server is a `Future` that must either be `.await`ed, or run it
/// as a background task using `tokio::spawn`.
///
/// Most of the details from `settings` will be respected, except for those that
/// go into building the listener (the host and port). If you want to respect the
/// settings specified in that object, you must include them in the construction
/// of `listener`.
///
/// # Errors
///
/// Returns an error if the sightseeing provider cannot be set up, or if the
/// server cannot be started on the provided listener.
///
/// # Examples
///
/// Run the server in the foreground. This will only return if there is an error
/// that causes the server to shut down. This is used to run Charlie as a service,
/// such as in production.
///
/// ```no_run
/// # actix_rt::System::new().block_on(async {
/// let listener = std::net::TcpListener::bind("127.0.0.1:8003")
///     .expect("Failed to bind port");
/// let settings = charlie_settings::Settings::load()
///     .expect("Failed to load settings");
/// let metrics_client = cadence::StatsdClient::from_sink("charlie", cadence::NopMetricSink);
/// charlie_web::run(listener, metrics_client, settings)
///     .expect("Failed to start server")
///     .await
///     .expect("Fatal error while running server");
/// # })
/// ```
pub fn run(
    listener: TcpListener,
    metrics_client: StatsdClient,
    settings: Settings,
) -> Result<Server> {
    let provider = SightseeingProviderRef::init(&settings)?;
    run_with_provider(listener, metrics_client, settings, provider)
}

/// Run the web server with an already built sightseeing provider.
///
/// This behaves like [`run`], but skips setting up the provider described by
/// `settings.upstream`.
///
/// # Errors
///
/// Returns an error if the server cannot be started on the provided listener.
pub fn run_with_provider(
    listener: TcpListener,
    metrics_client: StatsdClient,
    settings: Settings,
    provider: SightseeingProviderRef,
) -> Result<Server> {
    let num_workers = settings.http.workers;
    let settings = Data::new(settings);
    let metrics_client = Data::new(metrics_client);
    let provider = Data::new(provider);
    let server_start = Data::new(ServerStart::now());

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(settings.clone())
            .app_data(metrics_client.clone())
            .app_data(provider.clone())
            .app_data(server_start.clone())
            .wrap(middleware::Metrics)
            .wrap(TracingLogger::<CharlieRootSpanBuilder>::new())
            .wrap(Cors::permissive())
            // The core functionality of Charlie
            .service(web::scope("v1").configure(sightseeing::configure))
            .service(web::scope("api/v1").configure(health::configure))
            // Add some debugging views
            .service(web::scope("debug").configure(debug::configure))
            .service(root_info)
    })
    .listen(listener)
    .context("Listening for connections")?;

    if let Some(n) = num_workers {
        server = server.workers(n);
    }

    Ok(server.run())
}

/// The root view, to provide information about what this service is.
///
/// This is intended to be seen by people trying to investigate what this service
/// is. It should redirect to documentation, if it is available, or provide a
/// short message otherwise.
#[get("/")]
async fn root_info(settings: Data<Settings>) -> HttpResponse {
    match &settings.public_documentation {
        Some(redirect_url) => HttpResponse::Found()
            .insert_header(("location", redirect_url.as_str()))
            .finish(),
        None => HttpResponse::Ok().content_type("text/plain").body(
            "Charlie is a travel agent service finding sightseeing tours around a destination.",
        ),
    }
}
