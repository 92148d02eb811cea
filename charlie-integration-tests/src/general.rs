//! Tests Charlie's root and debug views.
#![cfg(test)]

use crate::{charlie_test, TestingTools};
use anyhow::Result;
use reqwest::{header::HeaderValue, StatusCode};
use serde_json::Value;

#[actix_rt::test]
async fn root_of_services_provides_public_docs() -> Result<()> {
    charlie_test(
        |settings| settings.public_documentation = Some("https://example.com/".to_string()),
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/").send().await?;

            assert_eq!(response.status(), StatusCode::FOUND);
            assert_eq!(
                response.headers().get("location"),
                Some(&HeaderValue::from_static("https://example.com/"))
            );

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn root_of_services_has_a_fallback_message() -> Result<()> {
    charlie_test(
        |settings| settings.public_documentation = None,
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/").send().await?;

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.text().await?,
                "Charlie is a travel agent service finding sightseeing tours around a destination."
            );

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn debug_settings_hides_the_api_key() -> Result<()> {
    charlie_test(
        |settings| settings.debug = true,
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/debug/settings").send().await?;
            assert_eq!(response.status(), StatusCode::OK);

            let body: Value = response.json().await?;
            assert_eq!(body["agent"]["name"], "Charlie");
            assert!(body["upstream"].get("api_key").is_none());
            assert!(!body.to_string().contains("test-key"));

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn debug_settings_requires_debug() -> Result<()> {
    charlie_test(
        |settings| settings.debug = false,
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/debug/settings").send().await?;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            Ok(())
        },
    )
    .await
}
