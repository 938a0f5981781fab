//! Mock transport for testing.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::errors::{ClientError, ClientResult, NetworkErrorKind};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

/// A recorded request for verification.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: Method,
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Bytes>,
}

impl RecordedRequest {
    /// Returns the bearer token sent with the request, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get("Authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
    }

    /// Returns true if the request targeted a URL ending with `suffix`.
    pub fn url_ends_with(&self, suffix: &str) -> bool {
        self.url.ends_with(suffix)
    }

    /// Parses the request body as JSON, if there is one.
    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .and_then(|body| serde_json::from_slice(body).ok())
    }
}

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// An HTTP response.
    Http(HttpResponse),
    /// A transport failure.
    NetworkError(NetworkErrorKind),
}

impl MockResponse {
    /// Creates a 200 JSON response.
    pub fn json(body: impl serde::Serialize) -> Self {
        Self::status_json(200, body)
    }

    /// Creates a JSON response with the given status.
    pub fn status_json(status: u16, body: impl serde::Serialize) -> Self {
        Self::Http(HttpResponse {
            status,
            headers: [("content-type".to_string(), "application/json".to_string())]
                .into_iter()
                .collect(),
            body: Bytes::from(serde_json::to_vec(&body).unwrap_or_default()),
        })
    }

    /// Creates a plain-text response.
    pub fn text(status: u16, body: &str) -> Self {
        Self::Http(HttpResponse {
            status,
            headers: [("content-type".to_string(), "text/plain".to_string())]
                .into_iter()
                .collect(),
            body: Bytes::from(body.to_string()),
        })
    }

    /// Creates an error response with the API's error body shape.
    pub fn error(status: u16, message: &str) -> Self {
        Self::status_json(
            status,
            serde_json::json!({ "message": message, "status": status }),
        )
    }

    /// Creates a 429 response with a `Retry-After` header.
    pub fn rate_limited(retry_after_secs: u64) -> Self {
        let mut response = Self::error(429, "Too many requests");
        if let Self::Http(http) = &mut response {
            http.headers
                .insert("retry-after".to_string(), retry_after_secs.to_string());
        }
        response
    }

    /// Creates a token endpoint response.
    pub fn token(access_token: &str, expires_in: u64) -> Self {
        Self::json(serde_json::json!({
            "access_token": access_token,
            "refresh_token": format!("refresh-{}", access_token),
            "token_type": "Bearer",
            "expires_in": expires_in,
            "scope": "cloud-api-v1",
        }))
    }
}

/// Mock transport for testing.
///
/// Requests to the token endpoint and to every other endpoint are answered
/// from two separate queues so tests can script them independently.
#[derive(Default)]
pub struct MockTransport {
    token_responses: Mutex<VecDeque<MockResponse>>,
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_token_response: Mutex<Option<MockResponse>>,
    delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport that always hands out the given token.
    pub fn with_token(access_token: &str) -> Self {
        let transport = Self::new();
        transport.set_default_token_response(MockResponse::token(access_token, 3600));
        transport
    }

    /// Queues a reply for the token endpoint.
    pub fn enqueue_token_response(&self, response: MockResponse) -> &Self {
        lock(&self.token_responses).push_back(response);
        self
    }

    /// Sets the reply used when the token queue is empty.
    pub fn set_default_token_response(&self, response: MockResponse) -> &Self {
        *lock(&self.default_token_response) = Some(response);
        self
    }

    /// Queues a reply for a resource endpoint.
    pub fn enqueue_response(&self, response: MockResponse) -> &Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Delays every reply by the given duration.
    pub fn set_delay(&self, delay: Duration) -> &Self {
        *lock(&self.delay) = Some(delay);
        self
    }

    /// Gets all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets recorded requests to the token endpoint.
    pub fn token_requests(&self) -> Vec<RecordedRequest> {
        self.get_requests()
            .into_iter()
            .filter(|r| is_token_request(&r.url))
            .collect()
    }

    /// Gets recorded requests to resource endpoints.
    pub fn api_requests(&self) -> Vec<RecordedRequest> {
        self.get_requests()
            .into_iter()
            .filter(|r| !is_token_request(&r.url))
            .collect()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let is_token = is_token_request(&request.url);

        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            url: request.url,
            headers: request.headers,
            body: request.body,
        });

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = if is_token {
            let queued = lock(&self.token_responses).pop_front();
            queued.or_else(|| lock(&self.default_token_response).clone())
        } else {
            lock(&self.responses).pop_front()
        };

        match reply {
            Some(MockResponse::Http(response)) => Ok(response),
            Some(MockResponse::NetworkError(kind)) => Err(ClientError::Network {
                kind,
                message: "mock network failure".to_string(),
            }),
            None => Err(ClientError::Network {
                kind: NetworkErrorKind::Connection,
                message: "No mock response available".to_string(),
            }),
        }
    }
}

fn is_token_request(url: &str) -> bool {
    url.ends_with(crate::config::TOKEN_ENDPOINT_PATH)
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
