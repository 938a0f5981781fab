//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use datacrunch_client::{DataCrunchClient, DataCrunchClientBuilder, RetryConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN_PATH: &str = "/v1/oauth2/token";

/// Starts a mock server.
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Fast retry policy so exhausted budgets do not slow the suite down.
pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(20),
        backoff_multiplier: 2.0,
        jitter: 0.0,
        max_elapsed: Duration::from_secs(10),
    }
}

/// A client builder pointed at the mock server.
pub fn client_builder(server: &MockServer) -> DataCrunchClientBuilder {
    DataCrunchClient::builder()
        .client_id("client-id")
        .client_secret("client-secret")
        .base_url(format!("{}/v1", server.uri()))
        .timeout(Duration::from_secs(5))
        .retry_config(fast_retry(2))
}

/// A client pointed at the mock server.
pub fn create_test_client(server: &MockServer) -> DataCrunchClient {
    client_builder(server).build().unwrap()
}

/// A successful token endpoint response.
pub fn token_response(access_token: &str, expires_in: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "access_token": access_token,
        "refresh_token": format!("refresh-{}", access_token),
        "token_type": "Bearer",
        "expires_in": expires_in,
        "scope": "cloud-api-v1"
    }))
}

/// Mounts a token endpoint that always issues `access_token`.
pub async fn mount_token(server: &MockServer, access_token: &str) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response(access_token, 3600))
        .mount(server)
        .await;
}
