//! Tests Charlie's sightseeing endpoints against a mocked tour search.
#![cfg(test)]

use crate::{charlie_test, TestingTools};
use anyhow::Result;
use httpmock::Method::GET;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// An upstream body listing tours with the given ratings, in order.
fn tours_with_ratings(ratings: &[f64]) -> Value {
    let data: Vec<Value> = ratings
        .iter()
        .enumerate()
        .map(|(idx, rating)| {
            json!({
                "title": format!("Tour {}", idx),
                "description": "A walk",
                "category": "Walking",
                "image": format!("https://images.example.com/{}.jpg", idx),
                "url": format!("https://tours.example.com/{}", idx),
                "rating": rating,
                "price": {"total": 25 + idx, "currency": "EUR"},
            })
        })
        .collect();
    json!({ "status": true, "data": data })
}

/// Pull one field out of every tour in a response body.
fn field_of_each(body: &Value, field: &str) -> Vec<Value> {
    body["sightSeeing"]
        .as_array()
        .expect("sightSeeing should be a list")
        .iter()
        .map(|tour| tour[field].clone())
        .collect()
}

#[actix_rt::test]
async fn top_sight_seeing_ranks_and_limits() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            let search = upstream_mock
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/tours")
                        .query_param("location", "Paris")
                        .header("x-rapidapi-key", "test-key");
                    then.status(200)
                        .json_body(tours_with_ratings(&[3.0, 5.0, 1.0, 4.0, 2.0, 4.5]));
                })
                .await;

            let response = test_client
                .get("/v1/get_sight_seeing?destination=Paris")
                .send()
                .await?;
            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;

            search.assert_async().await;
            assert_eq!(body["agent"], json!("Charlie"));
            assert_eq!(body["extractedInfo"], json!("Paris"));
            assert_eq!(
                field_of_each(&body, "rating"),
                vec![json!(5.0), json!(4.5), json!(4.0), json!(3.0)]
            );
            assert_eq!(
                body["sightSeeing"][0],
                json!({
                    "category": "Walking",
                    "description": "A walk",
                    "image": "https://images.example.com/1.jpg",
                    "title": "Tour 1",
                    "link": "https://tours.example.com/1",
                    "price": {"price": 26, "currency": "EUR"},
                    "rating": 5.0,
                })
            );
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn all_sight_seeing_keeps_upstream_order() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            upstream_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/tours");
                    then.status(200)
                        .json_body(tours_with_ratings(&[3.0, 5.0, 1.0, 4.0, 2.0, 4.5]));
                })
                .await;

            let body: Value = test_client
                .get("/v1/get_all_sight_seeing?destination=Paris")
                .send()
                .await?
                .json()
                .await?;

            assert_eq!(
                field_of_each(&body, "title"),
                (0..6)
                    .map(|idx| json!(format!("Tour {}", idx)))
                    .collect::<Vec<_>>()
            );
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn sparse_records_get_placeholders() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            upstream_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/tours");
                    then.status(200).json_body(json!({"data": [{"title": ""}]}));
                })
                .await;

            let body: Value = test_client
                .get("/v1/get_all_sight_seeing?destination=Reykjavik")
                .send()
                .await?
                .json()
                .await?;

            assert_eq!(
                body["sightSeeing"],
                json!([{
                    "description": "N/A",
                    "image": "N/A",
                    "title": "N/A",
                    "link": "N/A",
                    "price": {"price": "N/A", "currency": "USD"},
                }])
            );
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn destination_can_come_from_a_json_body() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            let search = upstream_mock
                .mock_async(|when, then| {
                    when.method(GET)
                        .path("/tours")
                        .query_param("location", "Kyoto");
                    then.status(200).json_body(json!({"data": []}));
                })
                .await;

            let response = test_client
                .get("/v1/get_sight_seeing")
                .json(&json!({"destination": "Kyoto"}))
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body["extractedInfo"], json!("Kyoto"));
            assert_eq!(body["sightSeeing"], json!([]));
            search.assert_async().await;
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn missing_destination_never_reaches_upstream() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            let search = upstream_mock
                .mock_async(|when, then| {
                    when.path("/tours");
                    then.status(200).json_body(json!({"data": []}));
                })
                .await;

            for path in [
                "/v1/get_sight_seeing",
                "/v1/get_all_sight_seeing?destination=",
            ] {
                let response = test_client.get(path).send().await?;
                assert_eq!(response.status(), StatusCode::BAD_REQUEST);
                let body: Value = response.json().await?;
                assert_eq!(body, json!({"error": "Destination is required"}));
            }

            search.assert_hits_async(0).await;
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn body_without_tours_is_echoed_as_not_found() -> Result<()> {
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
                    then.status(200)
                        .json_body(json!({"status": false, "message": "Location not found"}));
                })
                .await;

            let response = test_client
                .get("/v1/get_sight_seeing?destination=Atlantis")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({
                    "error": "No sightseeing data found",
                    "apiResponse": {"status": false, "message": "Location not found"},
                })
            );
            assert!(metrics_watcher.has_counter("sightseeing.no-data"));
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn upstream_rejection_reports_its_body() -> Result<()> {
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
                    then.status(429)
                        .json_body(json!({"message": "Too many requests"}));
                })
                .await;

            let response = test_client
                .get("/v1/get_all_sight_seeing?destination=Paris")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({
                    "error": "Failed to fetch sightSeeing details",
                    "details": "Request failed with status code 429",
                    "apiError": {"message": "Too many requests"},
                })
            );
            assert!(metrics_watcher.has_counter("sightseeing.upstream-error"));
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn empty_upstream_error_body_has_no_details() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            upstream_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/tours");
                    then.status(502);
                })
                .await;

            let response = test_client
                .get("/v1/get_sight_seeing?destination=Paris")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = response.json().await?;
            assert_eq!(
                body,
                json!({
                    "error": "Failed to fetch sightSeeing details",
                    "details": "Request failed with status code 502",
                    "apiError": "No additional details",
                })
            );
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn unreachable_upstream_has_no_details() -> Result<()> {
    charlie_test(
        |settings| settings.upstream.endpoint = "http://127.0.0.1:1/tours".to_string(),
        |TestingTools { test_client, .. }| async move {
            let response = test_client
                .get("/v1/get_sight_seeing?destination=Paris")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = response.json().await?;
            assert_eq!(body["error"], json!("Failed to fetch sightSeeing details"));
            assert_eq!(body["apiError"], json!("No additional details"));
            assert!(body["details"].is_string());
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn cross_origin_requests_are_allowed() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             test_client,
             upstream_mock,
             ..
         }| async move {
            upstream_mock
                .mock_async(|when, then| {
                    when.method(GET).path("/tours");
                    then.status(200).json_body(json!({"data": []}));
                })
                .await;

            let response = test_client
                .get("/v1/get_sight_seeing?destination=Paris")
                .header("origin", "https://app.example.org")
                .send()
                .await?;

            assert_eq!(response.status(), StatusCode::OK);
            assert!(response
                .headers()
                .contains_key("access-control-allow-origin"));
            Ok(())
        },
    )
    .await
}
