//! The liveness check reporting how long the server has been up.

use std::time::Instant;

use actix_web::{
    get,
    web::{Data, ServiceConfig},
    HttpResponse,
};
use charlie_settings::Settings;
use serde::Serialize;

/// Configure a route for the health check.
pub fn configure(config: &mut ServiceConfig) {
    config.service(health);
}

/// When the server started accepting requests.
#[derive(Debug, Clone, Copy)]
pub struct ServerStart(pub Instant);

impl ServerStart {
    /// Mark the server as starting now.
    pub fn now() -> Self {
        Self(Instant::now())
    }

    /// Seconds elapsed since the server started.
    fn uptime(&self) -> f64 {
        self.0.elapsed().as_secs_f64()
    }
}

/// The body of a health check response.
#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    /// Always `OK` while the server can answer.
    status: &'static str,
    /// The name of the agent answering.
    server: &'a str,
    /// Seconds since the server started.
    uptime: f64,
}

/// Report that the server is alive.
#[get("/health")]
async fn health(settings: Data<Settings>, start: Data<ServerStart>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK",
        server: &settings.agent.name,
        uptime: start.uptime(),
    })
}
