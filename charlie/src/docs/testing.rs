//! # Testing strategies
//!
//! There are two major testing strategies used in this repository: unit tests,
//! and integration tests.
//!
//! Unit tests should appear close to the code they are testing, using standard
//! Rust unit tests. This is suitable for testing complex behavior at a small
//! scale, with fine grained control over the inputs. The normalizer in
//! `charlie-sightseeing` is tested this way.
//!
//! However, many behaviors are difficult to test as unit tests, especially
//! details like the URLs we expose via the web service. To test these parts of
//! Charlie, we have [`charlie-integration-tests`][test-crate], which starts an
//! instance of Charlie pointed at a mock upstream provider. HTTP requests can
//! then be made to that server in order to test its behavior.
//!
//! [test-crate]: ../../../charlie_integration_tests/
//!
//! ```ignore
//! #[actix_rt::test]
//! async fn health_works() {
//!     charlie_test(
//!         |_| (),
//!         |TestingTools { test_client, .. }| async move {
//!             let response = test_client
//!                 .get("/api/v1/health")
//!                 .send()
//!                 .await
//!                 .expect("failed to execute request");
//!
//!             assert_eq!(response.status(), StatusCode::OK);
//!         },
//!     )
//!     .await
//! }
//! ```
