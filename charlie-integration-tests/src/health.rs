//! Tests the health check API.
#![cfg(test)]

use crate::{charlie_test, TestingTools};
use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[actix_rt::test]
async fn health_reports_agent_and_uptime() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let response = test_client.get("/api/v1/health").send().await?;
            assert_eq!(response.status(), StatusCode::OK);

            let body: Value = response.json().await?;
            assert_eq!(body["status"], "OK");
            assert_eq!(body["server"], "Charlie");
            let uptime = body["uptime"].as_f64().expect("uptime should be a number");
            assert!(uptime >= 0.0);

            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn health_uses_the_configured_agent_name() -> Result<()> {
    charlie_test(
        |settings| settings.agent.name = "Delta".to_string(),
        |TestingTools { test_client, .. }| async move {
            let body: Value = test_client.get("/api/v1/health").send().await?.json().await?;
            assert_eq!(body["server"], "Delta");
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn uptime_does_not_go_backwards() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools { test_client, .. }| async move {
            let first: Value = test_client.get("/api/v1/health").send().await?.json().await?;
            actix_rt::time::sleep(std::time::Duration::from_millis(20)).await;
            let second: Value = test_client.get("/api/v1/health").send().await?.json().await?;

            let first = first["uptime"].as_f64().expect("uptime should be a number");
            let second = second["uptime"].as_f64().expect("uptime should be a number");
            assert!(second > first);
            Ok(())
        },
    )
    .await
}
