//! Actix middlewares used by Charlie.

mod metrics;

pub use metrics::Metrics;
