//! Token Manager
//!
//! Acquires access tokens with the client-credentials grant, caches them and
//! refreshes them shortly before they expire.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::token::{Token, TokenResponse};
use crate::config::{ClientConfig, Credentials, TokenRequestFormat};
use crate::errors::{ApiError, ClientError, ClientResult};
use crate::resilience::RetryExecutor;
use crate::transport::{HttpRequest, HttpTransport, Method};

/// Token manager interface.
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Returns a token that is valid for at least the safety margin,
    /// exchanging credentials if the cache is empty or stale.
    async fn get_valid_token(&self) -> ClientResult<Token>;

    /// Clears the cached token.
    async fn invalidate(&self);

    /// Clears the cached token only if it is still `access_token`.
    ///
    /// A token rejected by the server may already have been replaced by
    /// another caller; that replacement must survive.
    async fn invalidate_if_current(&self, access_token: &str);
}

/// Grant used for one exchange.
enum Grant<'a> {
    ClientCredentials,
    RefreshToken(&'a str),
}

impl Grant<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::ClientCredentials => "client_credentials",
            Self::RefreshToken(_) => "refresh_token",
        }
    }
}

/// Token manager backed by the provider's OAuth2 token endpoint.
///
/// The cache lock is held for the whole exchange, so concurrent callers that
/// find the cache stale wait for the exchange in flight and then receive its
/// token instead of starting their own.
pub struct OAuth2TokenManager {
    credentials: Credentials,
    token_url: String,
    request_format: TokenRequestFormat,
    safety_margin: Duration,
    timeout: Duration,
    transport: Arc<dyn HttpTransport>,
    retry: RetryExecutor,
    cache: Mutex<Option<Token>>,
}

impl OAuth2TokenManager {
    /// Creates a token manager from the client configuration.
    pub fn new(config: &ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            credentials: config.credentials().clone(),
            token_url: config.token_url(),
            request_format: config.token_request_format,
            safety_margin: config.token_safety_margin,
            timeout: config.timeout,
            transport,
            retry: RetryExecutor::new(config.retry.clone()),
            cache: Mutex::new(None),
        }
    }

    /// Returns the cached token without triggering an exchange.
    pub async fn cached_token(&self) -> Option<Token> {
        self.cache.lock().await.clone()
    }

    fn build_request_body(&self, grant: &Grant<'_>) -> String {
        let mut params = vec![("grant_type", grant.name())];

        match grant {
            Grant::ClientCredentials => {
                params.push(("client_id", self.credentials.client_id()));
                params.push(("client_secret", self.credentials.client_secret()));
            }
            Grant::RefreshToken(refresh_token) => {
                params.push(("refresh_token", refresh_token));
            }
        }

        match self.request_format {
            TokenRequestFormat::Json => {
                let body: serde_json::Map<String, serde_json::Value> = params
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect();
                serde_json::Value::Object(body).to_string()
            }
            TokenRequestFormat::Form => params
                .into_iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&"),
        }
    }

    fn content_type(&self) -> &'static str {
        match self.request_format {
            TokenRequestFormat::Json => "application/json",
            TokenRequestFormat::Form => "application/x-www-form-urlencoded",
        }
    }

    async fn exchange(&self, grant: Grant<'_>) -> ClientResult<Token> {
        let body = self.build_request_body(&grant);
        let operation = grant.name();

        let response = self
            .retry
            .execute(operation, || {
                let mut request = HttpRequest::new(Method::Post, self.token_url.clone())
                    .header("Content-Type", self.content_type())
                    .header("Accept", "application/json")
                    .body(body.clone());
                request.timeout = Some(self.timeout);
                self.transport.send(request)
            })
            .await?;

        if !response.is_success() {
            let error = ApiError::from_response(response.status, &response.body);
            return Err(ClientError::auth(
                format!("Token exchange failed: {}", error.message),
                Some(response.status),
            ));
        }

        let parsed: TokenResponse = serde_json::from_slice(&response.body).map_err(|e| {
            ClientError::auth(format!("Malformed token response: {}", e), Some(response.status))
        })?;

        if parsed.access_token.is_empty() {
            return Err(ClientError::auth(
                "Malformed token response: empty access_token",
                Some(response.status),
            ));
        }

        let token = Token::from_response(parsed, Utc::now());
        debug!(
            grant = operation,
            expires_at = %token.expires_at,
            "Obtained access token"
        );
        Ok(token)
    }
}

#[async_trait]
impl TokenManager for OAuth2TokenManager {
    #[instrument(skip(self))]
    async fn get_valid_token(&self) -> ClientResult<Token> {
        let mut cached = self.cache.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(Utc::now(), self.safety_margin) {
                return Ok(token.clone());
            }
        }

        let refresh_token = cached.as_ref().and_then(|t| t.refresh_token.clone());

        let token = match refresh_token {
            Some(refresh_token) => match self.exchange(Grant::RefreshToken(&refresh_token)).await {
                Ok(token) => token,
                Err(error) => {
                    warn!(error = %error, "Refresh grant failed, falling back to client credentials");
                    self.exchange(Grant::ClientCredentials).await?
                }
            },
            None => self.exchange(Grant::ClientCredentials).await?,
        };

        *cached = Some(token.clone());
        Ok(token)
    }

    async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    async fn invalidate_if_current(&self, access_token: &str) {
        let mut cached = self.cache.lock().await;
        if cached
            .as_ref()
            .is_some_and(|token| token.access_token == access_token)
        {
            debug!("Invalidating rejected access token");
            *cached = None;
        }
    }
}
