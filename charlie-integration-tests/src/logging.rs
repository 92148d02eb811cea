//! Tests that Charlie logs behave as expected.
//!
//! Only events emitted on the test's own thread reach the log watcher. Request
//! handlers run on server worker threads, so their events are not collected.
#![cfg(test)]

use crate::{charlie_test, TestingTools};
use anyhow::Result;
use tracing::Level;

#[actix_rt::test]
async fn provider_setup_is_logged() -> Result<()> {
    charlie_test(
        |_| (),
        |TestingTools {
             mut log_watcher, ..
         }| async move {
            assert!(log_watcher.has(|event| event.level == Level::INFO
                && event.field_contains("message", "Setting up sightseeing provider")));
            Ok(())
        },
    )
    .await
}

#[actix_rt::test]
async fn missing_api_key_is_warned_about() -> Result<()> {
    charlie_test(
        |settings| settings.upstream.api_key = String::new(),
        |TestingTools {
             mut log_watcher, ..
         }| async move {
            assert!(log_watcher.has(|event| event.level == Level::WARN
                && event.field_contains("type", "sightseeing.rapid-api.missing-key")));
            Ok(())
        },
    )
    .await
}
