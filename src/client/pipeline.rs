//! Request pipeline shared by every resource service.
//!
//! One logical API operation goes through [`RequestPipeline`]: it attaches
//! the bearer token, encodes the JSON body, classifies the response status and
//! retries transient failures within the configured budget.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::auth::TokenManager;
use crate::config::ClientConfig;
use crate::errors::{ApiError, ClientError, ClientResult};
use crate::resilience::RetryExecutor;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Executes authenticated API calls with uniform error mapping and retry.
pub struct RequestPipeline {
    base_url: String,
    user_agent: String,
    timeout: Duration,
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenManager>,
    retry: RetryExecutor,
}

impl RequestPipeline {
    /// Creates a pipeline over the given transport and token manager.
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<dyn TokenManager>,
    ) -> Self {
        Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            transport,
            tokens,
            retry: RetryExecutor::new(config.retry.clone()),
        }
    }

    /// Returns the token manager used by this pipeline.
    pub fn token_manager(&self) -> &Arc<dyn TokenManager> {
        &self.tokens
    }

    /// Executes an operation and decodes the JSON response into `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> ClientResult<T> {
        let response = self.execute_raw(method, path, body).await?;
        decode_json(&response.body)
    }

    /// Like [`execute`](Self::execute), aborting when `cancel` fires.
    pub async fn execute_with_cancellation<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        cancel: &CancellationToken,
    ) -> ClientResult<T> {
        let response = self
            .execute_raw_with_cancellation(method, path, body, cancel)
            .await?;
        decode_json(&response.body)
    }

    /// Executes an operation whose successful response is plain text, such
    /// as a bare identifier.
    pub async fn execute_text(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> ClientResult<String> {
        let response = self.execute_raw(method, path, body).await?;
        Ok(decode_text(&response.body))
    }

    /// Executes an operation whose successful response body is irrelevant.
    pub async fn execute_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> ClientResult<()> {
        self.execute_raw(method, path, body).await.map(|_| ())
    }

    /// Executes an operation and returns the successful response unchanged.
    #[instrument(skip(self, method, body), fields(method = %method))]
    pub async fn execute_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> ClientResult<HttpResponse> {
        let url = self.url(path);
        let reauthenticated = AtomicBool::new(false);
        let token_failed = AtomicBool::new(false);
        let operation = format!("{} {}", method, path);

        let response = self
            .retry
            .execute_if(
                &operation,
                || self.attempt(method, &url, body.clone(), &reauthenticated, &token_failed),
                |error| error.is_retryable() && !token_failed.load(Ordering::SeqCst),
            )
            .await?;

        debug!(status = response.status, "Request succeeded");
        Ok(response)
    }

    /// Like [`execute_raw`](Self::execute_raw), aborting when `cancel` fires.
    ///
    /// Cancellation drops the in-flight request and any pending backoff, so
    /// nothing is retried after the signal.
    pub async fn execute_raw_with_cancellation(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        cancel: &CancellationToken,
    ) -> ClientResult<HttpResponse> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(%method, path, "Request cancelled");
                Err(ClientError::Cancelled)
            }
            result = self.execute_raw(method, path, body) => result,
        }
    }

    /// `GET` decoding JSON.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(Method::Get, path, None).await
    }

    /// `POST` with a JSON body, decoding JSON.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::Post, path, Some(json_body(body)?)).await
    }

    /// `POST` with a JSON body, returning the plain-text response.
    pub async fn post_text<B>(&self, path: &str, body: &B) -> ClientResult<String>
    where
        B: Serialize + ?Sized,
    {
        self.execute_text(Method::Post, path, Some(json_body(body)?))
            .await
    }

    /// `POST` with a JSON body, ignoring the response body.
    pub async fn post_empty<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute_empty(Method::Post, path, Some(json_body(body)?))
            .await
    }

    /// `POST` without a body, ignoring the response body.
    pub async fn post_action(&self, path: &str) -> ClientResult<()> {
        self.execute_empty(Method::Post, path, None).await
    }

    /// `PUT` with a JSON body, ignoring the response body.
    pub async fn put_empty<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute_empty(Method::Put, path, Some(json_body(body)?))
            .await
    }

    /// `PATCH` with a JSON body, decoding JSON.
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::Patch, path, Some(json_body(body)?)).await
    }

    /// `DELETE` ignoring the response body.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute_empty(Method::Delete, path, None).await
    }

    /// `DELETE` with a JSON body, ignoring the response body.
    pub async fn delete_with_body<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute_empty(Method::Delete, path, Some(json_body(body)?))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn build_request(
        &self,
        method: Method,
        url: &str,
        access_token: &str,
        body: Option<Bytes>,
    ) -> HttpRequest {
        let mut request = HttpRequest::new(method, url)
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Accept", "application/json")
            .header("User-Agent", self.user_agent.clone());

        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(body);
        }

        request.timeout = Some(self.timeout);
        request
    }

    /// One attempt, including at most one re-authentication per operation.
    ///
    /// Token acquisition retries on its own, so a failure there sets
    /// `token_failed` and ends the operation.
    async fn attempt(
        &self,
        method: Method,
        url: &str,
        body: Option<Bytes>,
        reauthenticated: &AtomicBool,
        token_failed: &AtomicBool,
    ) -> ClientResult<HttpResponse> {
        loop {
            let token = self.tokens.get_valid_token().await.map_err(|error| {
                token_failed.store(true, Ordering::SeqCst);
                error
            })?;
            let request = self.build_request(method, url, &token.access_token, body.clone());
            let response = self.transport.send(request).await?;

            if response.status != 401 {
                return classify(response);
            }

            let error = ApiError::from_response(response.status, &response.body);
            if reauthenticated.swap(true, Ordering::SeqCst) {
                return Err(ClientError::auth(
                    format!("Token rejected after refresh: {}", error.message),
                    Some(401),
                ));
            }

            warn!(%method, "Access token rejected, refreshing and retrying once");
            self.tokens.invalidate_if_current(&token.access_token).await;
        }
    }
}

/// Maps a non-401 response to success or a typed error.
fn classify(response: HttpResponse) -> ClientResult<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }

    let error = ApiError::from_response(response.status, &response.body);
    match response.status {
        404 => Err(ClientError::NotFound(error)),
        429 => Err(ClientError::RateLimit {
            retry_after: response.header("retry-after").and_then(parse_retry_after),
            error,
        }),
        _ => Err(ClientError::Api(error)),
    }
}

/// Parses a `Retry-After` value given in seconds or as an HTTP date.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = date.with_timezone(&Utc) - Utc::now();
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}

/// Encodes a request body as JSON.
pub fn json_body<B: Serialize + ?Sized>(body: &B) -> ClientResult<Bytes> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|e| ClientError::Serialization {
            message: e.to_string(),
        })
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> ClientResult<T> {
    serde_json::from_slice(body).map_err(|e| ClientError::deserialization(&e, body))
}

/// Plain-text identifiers are sometimes sent as a JSON string.
fn decode_text(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body).trim().to_string();
    serde_json::from_str::<String>(&text).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::OAuth2TokenManager;
    use crate::errors::NetworkErrorKind;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::resilience::RetryConfig;
    use test_case::test_case;

    fn config(max_retries: u32) -> ClientConfig {
        ClientConfig::builder()
            .client_id("client-id")
            .client_secret("client-secret")
            .base_url("https://api.test/v1")
            .retry_config(RetryConfig {
                max_retries,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(4),
                backoff_multiplier: 2.0,
                jitter: 0.0,
                max_elapsed: Duration::from_secs(5),
            })
            .build()
            .unwrap()
    }

    fn pipeline(transport: &Arc<MockTransport>, max_retries: u32) -> RequestPipeline {
        let config = config(max_retries);
        let tokens = Arc::new(OAuth2TokenManager::new(&config, transport.clone()));
        RequestPipeline::new(&config, transport.clone(), tokens)
    }

    #[derive(Debug, serde::Deserialize)]
    struct Item {
        id: String,
    }

    #[tokio::test]
    async fn test_get_decodes_json_and_sends_bearer() {
        let transport = Arc::new(MockTransport::with_token("tok1"));
        transport.enqueue_response(MockResponse::json(serde_json::json!([{"id": "i-1"}])));
        let pipeline = pipeline(&transport, 3);

        let items: Vec<Item> = pipeline.get("/instances").await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "i-1");
        let request = &transport.api_requests()[0];
        assert_eq!(request.url, "https://api.test/v1/instances");
        assert_eq!(request.bearer_token(), Some("tok1"));
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_post_text_returns_bare_identifier() {
        let transport = Arc::new(MockTransport::with_token("tok1"));
        transport.enqueue_response(MockResponse::text(201, "key-123\n"));
        let pipeline = pipeline(&transport, 3);

        let id = pipeline
            .post_text("/sshkeys", &serde_json::json!({"name": "k", "key": "ssh-ed25519 AAA"}))
            .await
            .unwrap();

        assert_eq!(id, "key-123");
        let request = &transport.api_requests()[0];
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_401_refreshes_once_then_succeeds() {
        let transport = Arc::new(MockTransport::new());
        transport.enqueue_token_response(MockResponse::token("stale", 3600));
        transport.enqueue_token_response(MockResponse::token("fresh", 3600));
        transport.enqueue_response(MockResponse::error(401, "token revoked"));
        transport.enqueue_response(MockResponse::json(serde_json::json!({"amount": 1.0})));
        let pipeline = pipeline(&transport, 3);

        let balance: serde_json::Value = pipeline.get("/balance").await.unwrap();

        assert_eq!(balance["amount"], 1.0);
        let api = transport.api_requests();
        assert_eq!(api.len(), 2);
        assert_eq!(api[0].bearer_token(), Some("stale"));
        assert_eq!(api[1].bearer_token(), Some("fresh"));
        assert_eq!(transport.token_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_second_401_is_auth_error_without_third_attempt() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::error(401, "nope"));
        transport.enqueue_response(MockResponse::error(401, "still nope"));
        transport.enqueue_response(MockResponse::json(serde_json::json!({})));
        let pipeline = pipeline(&transport, 3);

        let error = pipeline.get::<serde_json::Value>("/balance").await.unwrap_err();

        assert!(matches!(error, ClientError::Auth { status_code: Some(401), .. }));
        assert_eq!(transport.api_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_token_network_failure_spends_one_retry_budget() {
        let transport = Arc::new(MockTransport::new());
        transport.set_default_token_response(MockResponse::NetworkError(
            NetworkErrorKind::Connection,
        ));
        let pipeline = pipeline(&transport, 3);

        let error = pipeline.get::<serde_json::Value>("/balance").await.unwrap_err();

        assert!(matches!(
            error,
            ClientError::Network { kind: NetworkErrorKind::Connection, .. }
        ));
        assert_eq!(transport.token_requests().len(), 4);
        assert!(transport.api_requests().is_empty());
    }

    #[tokio::test]
    async fn test_api_network_failure_still_retried_after_token_success() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::NetworkError(NetworkErrorKind::Connection));
        transport.enqueue_response(MockResponse::json(serde_json::json!({"amount": 2.0})));
        let pipeline = pipeline(&transport, 3);

        let balance: serde_json::Value = pipeline.get("/balance").await.unwrap();

        assert_eq!(balance["amount"], 2.0);
        assert_eq!(transport.api_requests().len(), 2);
        assert_eq!(transport.token_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_400_is_never_retried() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::error(400, "invalid hostname"));
        transport.enqueue_response(MockResponse::json(serde_json::json!({})));
        let pipeline = pipeline(&transport, 3);

        let error = pipeline.get::<serde_json::Value>("/instances").await.unwrap_err();

        match error {
            ClientError::Api(api) => {
                assert_eq!(api.status_code, 400);
                assert_eq!(api.message, "invalid hostname");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
        assert_eq!(transport.api_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_404_is_not_found() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::error(404, "not here"));
        let pipeline = pipeline(&transport, 3);

        let error = pipeline.get::<serde_json::Value>("/scripts").await.unwrap_err();

        assert!(error.is_not_found());
        assert_eq!(error.status_code(), Some(404));
        assert_eq!(transport.api_requests().len(), 1);
    }

    #[test_case(500 ; "internal error")]
    #[test_case(502 ; "bad gateway")]
    #[test_case(503 ; "unavailable")]
    #[test_case(504 ; "gateway timeout")]
    #[tokio::test]
    async fn test_5xx_retried_until_budget_exhausted(status: u16) {
        let transport = Arc::new(MockTransport::with_token("tok"));
        for _ in 0..3 {
            transport.enqueue_response(MockResponse::error(status, "upstream trouble"));
        }
        let pipeline = pipeline(&transport, 2);

        let error = pipeline.get::<serde_json::Value>("/instances").await.unwrap_err();

        assert_eq!(error.status_code(), Some(status));
        assert!(matches!(error, ClientError::Api(_)));
        assert_eq!(transport.api_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_5xx_then_success() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::error(503, "busy"));
        transport.enqueue_response(MockResponse::json(serde_json::json!([])));
        let pipeline = pipeline(&transport, 2);

        let items: Vec<serde_json::Value> = pipeline.get("/volumes").await.unwrap();

        assert!(items.is_empty());
        assert_eq!(transport.api_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_429_exhausted_is_rate_limit_error() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        for _ in 0..2 {
            transport.enqueue_response(MockResponse::rate_limited(0));
        }
        let pipeline = pipeline(&transport, 1);

        let error = pipeline.get::<serde_json::Value>("/instances").await.unwrap_err();

        match error {
            ClientError::RateLimit { error, retry_after } => {
                assert_eq!(error.status_code, 429);
                assert_eq!(retry_after, Some(Duration::ZERO));
            }
            other => panic!("expected RateLimit, got {:?}", other),
        }
        assert_eq!(transport.api_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_retried_then_network_error() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        for _ in 0..3 {
            transport.enqueue_response(MockResponse::NetworkError(NetworkErrorKind::Connection));
        }
        let pipeline = pipeline(&transport, 2);

        let error = pipeline.get::<serde_json::Value>("/instances").await.unwrap_err();

        assert!(matches!(
            error,
            ClientError::Network {
                kind: NetworkErrorKind::Connection,
                ..
            }
        ));
        assert_eq!(transport.api_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_cancellation_aborts_request() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.set_delay(Duration::from_secs(30));
        transport.enqueue_response(MockResponse::json(serde_json::json!([])));
        let pipeline = pipeline(&transport, 3);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let result: ClientResult<Vec<serde_json::Value>> = pipeline
            .execute_with_cancellation(Method::Get, "/instances", None, &cancel)
            .await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_already_cancelled_sends_nothing() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        let pipeline = pipeline(&transport, 3);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = pipeline
            .execute_raw_with_cancellation(Method::Get, "/instances", None, &cancel)
            .await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert!(transport.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_deserialization_error() {
        let transport = Arc::new(MockTransport::with_token("tok"));
        transport.enqueue_response(MockResponse::text(200, "not json"));
        let pipeline = pipeline(&transport, 3);

        let error = pipeline.get::<Vec<Item>>("/instances").await.unwrap_err();
        assert!(matches!(error, ClientError::Deserialization { ref body, .. } if body == "not json"));
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("3"), Some(Duration::from_secs(3)));
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"),
            Some(Duration::ZERO)
        );
        assert_eq!(parse_retry_after("soon"), None);
    }

    #[test]
    fn test_decode_text_accepts_quoted_identifier() {
        assert_eq!(decode_text(b"\"abc\""), "abc");
        assert_eq!(decode_text(b"abc\n"), "abc");
    }
}
