//! Tests that Charlie reports metrics about the requests it serves.
#![cfg(test)]

use crate::{charlie_test, TestingTools};
use anyhow::Result;
use httpmock::Method::GET;
use serde_json::json;

#[actix_rt::test]
async fn requests_are_timed() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             test_client,
             mut metrics_watcher,
             ..
         }| async move {
            test_client.get("/api/v1/health").send().await?;

            assert!(metrics_watcher.has(|msg| msg.name == "request.duration"));
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn tour_counts_are_recorded() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             mut metrics_watcher,
             ..
         }| async move {
            upstream_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/tours");
                    then.status(200).json_body(json!({
                        "data": (0..6).map(|n| json!({"title": n.to_string(), "rating": n})).collect::<Vec<_>>()
                    }));
                })
                .await;

            test_client
                .get("/v1/get_sight_seeing?destination=Paris")
                .send()
                .await?;
            test_client
                .get("/v1/get_all_sight_seeing?destination=Paris")
                .send()
                .await?;

            assert!(metrics_watcher.has_histogram("sightseeing.tours-per", 4.0));
            assert!(metrics_watcher.has_histogram("sightseeing.tours-per", 6.0));
            Ok(())
        },
    )
    .await
}
