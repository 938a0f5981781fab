//! Configuration module for the DataCrunch client.
//!
//! Provides configuration management including credentials, base URLs,
//! timeouts, token refresh and retry settings.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{ClientError, ClientResult};
use crate::resilience::RetryConfig;

/// Default base URL for the DataCrunch API.
pub const DEFAULT_BASE_URL: &str = "https://api.datacrunch.io/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default margin before expiry at which a cached token is considered stale.
pub const DEFAULT_TOKEN_SAFETY_MARGIN: Duration = Duration::from_secs(60);

/// Path of the token endpoint, relative to the base URL.
pub const TOKEN_ENDPOINT_PATH: &str = "/oauth2/token";

/// Client identifier and secret used for the client-credentials grant.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
}

impl Credentials {
    /// Creates a new credential pair.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
        }
    }

    /// Returns the client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Body encoding used when talking to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenRequestFormat {
    /// `application/json`.
    #[default]
    Json,
    /// `application/x-www-form-urlencoded`.
    Form,
}

/// Configuration for the DataCrunch client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Client credentials.
    pub(crate) credentials: Credentials,
    /// Base URL for API requests, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
    /// How long before `expires_at` a cached token is refreshed.
    pub token_safety_margin: Duration,
    /// Token endpoint body encoding.
    pub token_request_format: TokenRequestFormat,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
}

impl ClientConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATACRUNCH_CLIENT_ID` (required)
    /// - `DATACRUNCH_CLIENT_SECRET` (required)
    /// - `DATACRUNCH_BASE_URL` (optional): Custom base URL
    /// - `DATACRUNCH_TIMEOUT` (optional): Request timeout in seconds
    /// - `DATACRUNCH_MAX_RETRIES` (optional): Maximum retry attempts
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<Self> {
        let client_id = lookup("DATACRUNCH_CLIENT_ID").ok_or_else(|| {
            ClientError::configuration("DATACRUNCH_CLIENT_ID environment variable not set")
        })?;
        let client_secret = lookup("DATACRUNCH_CLIENT_SECRET").ok_or_else(|| {
            ClientError::configuration("DATACRUNCH_CLIENT_SECRET environment variable not set")
        })?;

        let mut builder = ClientConfigBuilder::new()
            .client_id(client_id)
            .client_secret(client_secret);

        if let Some(base_url) = lookup("DATACRUNCH_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Some(timeout) = lookup("DATACRUNCH_TIMEOUT") {
            let secs = parse_env::<u64>("DATACRUNCH_TIMEOUT", &timeout)?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(retries) = lookup("DATACRUNCH_MAX_RETRIES") {
            builder = builder.max_retries(parse_env("DATACRUNCH_MAX_RETRIES", &retries)?);
        }

        builder.build()
    }

    /// Returns the credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the full URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns the full URL of the token endpoint.
    pub fn token_url(&self) -> String {
        self.endpoint_url(TOKEN_ENDPOINT_PATH)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .field("token_safety_margin", &self.token_safety_margin)
            .field("token_request_format", &self.token_request_format)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    client_id: Option<String>,
    client_secret: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    retry: Option<RetryConfig>,
    max_retries: Option<u32>,
    token_safety_margin: Option<Duration>,
    token_request_format: TokenRequestFormat,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client identifier.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the full retry policy.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Overrides only the number of retries of the retry policy.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Sets the token safety margin.
    pub fn token_safety_margin(mut self, margin: Duration) -> Self {
        self.token_safety_margin = Some(margin);
        self
    }

    /// Sets the token endpoint body encoding.
    pub fn token_request_format(mut self, format: TokenRequestFormat) -> Self {
        self.token_request_format = format;
        self
    }

    /// Sets the `User-Agent` header value.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ClientResult<ClientConfig> {
        let client_id = self
            .client_id
            .ok_or_else(|| ClientError::configuration("Client ID is required"))?;
        let client_secret = self
            .client_secret
            .ok_or_else(|| ClientError::configuration("Client secret is required"))?;

        if client_id.is_empty() {
            return Err(ClientError::configuration("Client ID cannot be empty"));
        }
        if client_secret.is_empty() {
            return Err(ClientError::configuration("Client secret cannot be empty"));
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::configuration(
                "Base URL must start with http:// or https://",
            ));
        }

        let mut retry = self.retry.unwrap_or_default();
        if let Some(max_retries) = self.max_retries {
            retry.max_retries = max_retries;
        }

        Ok(ClientConfig {
            credentials: Credentials::new(client_id, client_secret),
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            retry,
            token_safety_margin: self
                .token_safety_margin
                .unwrap_or(DEFAULT_TOKEN_SAFETY_MARGIN),
            token_request_format: self.token_request_format,
            user_agent: self.user_agent.unwrap_or_else(|| {
                format!("datacrunch-client-rust/{}", env!("CARGO_PKG_VERSION"))
            }),
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> ClientResult<T> {
    value.trim().parse().map_err(|_| {
        ClientError::configuration(format!("{} has an invalid value: {:?}", name, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn builder() -> ClientConfigBuilder {
        ClientConfig::builder()
            .client_id("client-id")
            .client_secret("client-secret")
    }

    #[test]
    fn test_config_builder_success() {
        let config = builder()
            .base_url("https://staging.example.com/v1/")
            .timeout(Duration::from_secs(5))
            .max_retries(5)
            .build()
            .unwrap();

        assert_eq!(config.credentials().client_id(), "client-id");
        assert_eq!(config.credentials().client_secret(), "client-secret");
        assert_eq!(config.base_url, "https://staging.example.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 5);
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: std::collections::HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_env_reads_optional_settings() {
        let config = ClientConfig::from_lookup(env(&[
            ("DATACRUNCH_CLIENT_ID", "id"),
            ("DATACRUNCH_CLIENT_SECRET", "secret"),
            ("DATACRUNCH_TIMEOUT", "12"),
            ("DATACRUNCH_MAX_RETRIES", "1"),
        ]))
        .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.retry.max_retries, 1);
    }

    #[test]
    fn test_from_env_missing_secret() {
        let error =
            ClientConfig::from_lookup(env(&[("DATACRUNCH_CLIENT_ID", "id")])).unwrap_err();

        assert!(matches!(
            error,
            ClientError::Configuration { ref message } if message.contains("DATACRUNCH_CLIENT_SECRET")
        ));
    }

    #[test_case("DATACRUNCH_TIMEOUT", "thirty" ; "timeout")]
    #[test_case("DATACRUNCH_MAX_RETRIES", "-1" ; "max retries")]
    fn test_from_env_rejects_unparsable_numbers(name: &str, value: &str) {
        let error = ClientConfig::from_lookup(env(&[
            ("DATACRUNCH_CLIENT_ID", "id"),
            ("DATACRUNCH_CLIENT_SECRET", "secret"),
            (name, value),
        ]))
        .unwrap_err();

        assert!(matches!(
            error,
            ClientError::Configuration { ref message } if message.contains(name)
        ));
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = builder().build().unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.token_safety_margin, DEFAULT_TOKEN_SAFETY_MARGIN);
        assert_eq!(config.token_request_format, TokenRequestFormat::Json);
        assert_eq!(config.retry.max_retries, RetryConfig::default().max_retries);
        assert!(config.user_agent.starts_with("datacrunch-client-rust/"));
    }

    #[test]
    fn test_config_builder_missing_credentials() {
        assert!(ClientConfig::builder().client_id("id").build().is_err());
        assert!(ClientConfig::builder().client_secret("secret").build().is_err());
        assert!(ClientConfig::builder()
            .client_id("")
            .client_secret("secret")
            .build()
            .is_err());
    }

    #[test]
    fn test_config_builder_invalid_base_url() {
        let result = builder().base_url("api.datacrunch.io").build();
        assert!(matches!(result, Err(ClientError::Configuration { .. })));
    }

    #[test]
    fn test_endpoint_url() {
        let config = builder().build().unwrap();

        assert_eq!(
            config.endpoint_url("/instances"),
            "https://api.datacrunch.io/v1/instances"
        );
        assert_eq!(
            config.token_url(),
            "https://api.datacrunch.io/v1/oauth2/token"
        );
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = builder().client_secret("super-secret").build().unwrap();

        let debug_str = format!("{:?}", config);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("super-secret"));
    }
}
