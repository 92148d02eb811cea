#![warn(missing_docs, clippy::missing_docs_in_private_items)]
// None of the tests are seen by the linter, so none of the utilities are marked
// as used. But docs don't generate for the below if they are `#[cfg(test)]`.
// This is a compromise.
#![allow(dead_code)]

//! Tests for Charlie that work by reading from the external API only.
//!
//! Since the URL endpoints Charlie exposes to the world are its public API, and
//! other systems depend on them, the paths used in tests here are important
//! details, and used to keep compatibility.
//!
//! This is structured as a separate crate so that it produces a single test
//! binary instead of one test per file like would happen if this were
//! `charlie/tests/...`. This improves compilation and test times.
//!
//! The primary tool used by tests is [`charlie_test`], which creates a mock
//! upstream provider, sets up the application for testing, and provides helpers
//! to inspect the state of the app. It then calls the test function that is
//! passed to it, providing the above tools as an argument.
//!
//! ```no_run
//! use charlie_integration_tests::{charlie_test, TestingTools};
//! use reqwest::StatusCode;
//!
//! # actix_rt::System::new().block_on(async {
//! charlie_test(
//!     |_| (),
//!     |TestingTools { test_client, .. }| async move {
//!         let response = test_client
//!             .get("/api/v1/health")
//!             .send()
//!             .await
//!             .expect("failed to execute request");
//!
//!         assert_eq!(response.status(), StatusCode::OK);
//!     },
//! )
//! .await
//! # })
//! ```

mod general;
mod health;
mod logging;
mod metrics;
mod sightseeing;
mod utils;

pub use crate::utils::{
    logging::{LogWatcher, TracingJsonEvent},
    metrics::MetricsWatcher,
    test_tools::{charlie_test, TestReqwestClient, TestingTools},
};
