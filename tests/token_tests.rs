//! Token lifecycle tests against a mock HTTP server.

mod common;

use std::time::Duration;

use common::*;
use datacrunch_client::prelude::*;
use datacrunch_client::{TokenManager, TokenRequestFormat};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn balance_body() -> serde_json::Value {
    serde_json::json!({"amount": 100.0, "currency": "usd"})
}

#[tokio::test]
async fn test_token_is_cached_across_requests() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(serde_json::json!({
            "grant_type": "client_credentials",
            "client_id": "client-id",
            "client_secret": "client-secret"
        })))
        .respond_with(token_response("tok1", 3600))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/balance"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client.balance().get().await.unwrap();
    client.balance().get().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_callers_share_single_exchange() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(token_response("tok1", 3600).set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/balance"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body()))
        .expect(10)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let balance = client.balance();
    let results = futures::future::join_all((0..10).map(|_| balance.get())).await;

    assert!(results.iter().all(Result::is_ok));
}

#[tokio::test]
async fn test_expired_token_is_refreshed_with_refresh_grant() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_partial_json(serde_json::json!({"grant_type": "client_credentials"})))
        .respond_with(token_response("tok1", 0))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_partial_json(serde_json::json!({
            "grant_type": "refresh_token",
            "refresh_token": "refresh-tok1"
        })))
        .respond_with(token_response("tok2", 3600))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/balance"))
        .and(header("authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/balance"))
        .and(header("authorization", "Bearer tok2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client.balance().get().await.unwrap();
    client.balance().get().await.unwrap();
}

#[tokio::test]
async fn test_rejected_credentials_fail_with_auth_error() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "invalid_client"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/balance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_body()))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let error = client.balance().get().await.unwrap_err();

    assert!(matches!(error, ClientError::Auth { status_code: Some(400), .. }));
    assert!(error.to_string().contains("invalid_client"));
}

#[tokio::test]
async fn test_form_encoded_token_request() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-id"))
        .respond_with(token_response("tok1", 3600))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"code": "FIN-01", "name": "Finland 1", "country_code": "FI"}
        ])))
        .mount(&server)
        .await;

    let client = client_builder(&server)
        .token_request_format(TokenRequestFormat::Form)
        .build()
        .unwrap();
    let locations = client.locations().list().await.unwrap();

    assert_eq!(locations[0].code, "FIN-01");
}

#[tokio::test]
async fn test_get_valid_token_reuses_cached_token() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access_token": "tok1", "expires_in": 3600})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let tokens = client.token_manager();

    let first = tokens.get_valid_token().await.unwrap();
    let second = tokens.get_valid_token().await.unwrap();

    assert_eq!(first.access_token, "tok1");
    assert_eq!(first, second);
    let lifetime = first.expires_at - chrono::Utc::now();
    assert!(lifetime > chrono::Duration::seconds(3590));
    assert!(lifetime <= chrono::Duration::seconds(3600));
}
