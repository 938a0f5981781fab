//! Error types for the DataCrunch client.
//!
//! Every failure surfaced by the request pipeline is one of the variants of
//! [`ClientError`]. HTTP failures keep their status code, message and raw body
//! in an [`ApiError`] so callers can decide between skipping and failing.

use bytes::Bytes;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// A non-2xx response from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status_code: u16,
    /// Message extracted from the error body.
    pub message: String,
    /// Raw response body, if any was returned.
    pub raw_body: Option<Bytes>,
}

impl ApiError {
    /// Builds an error from a status code and response body.
    ///
    /// The message is taken from a structured `{"message": ...}` body when
    /// present, otherwise from the body text, otherwise `HTTP <status>`.
    pub fn from_response(status_code: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ApiErrorResponse>(body)
            .ok()
            .and_then(|parsed| parsed.message.or(parsed.error))
            .or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                (!text.is_empty()).then_some(text)
            })
            .unwrap_or_else(|| format!("HTTP {} error", status_code));

        Self {
            status_code,
            message,
            raw_body: (!body.is_empty()).then(|| Bytes::copy_from_slice(body)),
        }
    }

    /// Creates an error without a body.
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            raw_body: None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status_code, self.message)
    }
}

/// Kind of transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// The request timed out.
    Timeout,
    /// The connection could not be established or was reset.
    Connection,
    /// The response body could not be read.
    Body,
    /// Any other transport failure.
    Other,
}

impl fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Connection => write!(f, "connection"),
            Self::Body => write!(f, "body"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Comprehensive error type for client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid client configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What was wrong with the configuration.
        message: String,
    },

    /// Credential exchange failed or the token was persistently rejected.
    #[error("Authentication failed: {message}")]
    Auth {
        /// Error message.
        message: String,
        /// HTTP status returned by the server, if any.
        status_code: Option<u16>,
    },

    /// Transport-level failure after the retry budget was exhausted.
    #[error("Network error ({kind}): {message}")]
    Network {
        /// Failure category.
        kind: NetworkErrorKind,
        /// Error message.
        message: String,
    },

    /// The resource or endpoint does not exist.
    #[error("Not found: {0}")]
    NotFound(ApiError),

    /// Rate limited and the retry budget was exhausted.
    #[error("Rate limit exceeded: {error}")]
    RateLimit {
        /// The last 429 response.
        error: ApiError,
        /// The last `Retry-After` hint, if the server sent one.
        retry_after: Option<Duration>,
    },

    /// Any other non-2xx response.
    #[error("API error: {0}")]
    Api(ApiError),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// Request body could not be encoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Response body could not be decoded.
    #[error("Deserialization error: {message}")]
    Deserialization {
        /// Error message.
        message: String,
        /// The body that failed to decode.
        body: String,
    },
}

impl ClientError {
    /// Returns the HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Auth { status_code, .. } => *status_code,
            Self::NotFound(error) | Self::Api(error) => Some(error.status_code),
            Self::RateLimit { error, .. } => Some(error.status_code),
            _ => None,
        }
    }

    /// Returns the [`ApiError`] carried by this error, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::NotFound(error) | Self::Api(error) => Some(error),
            Self::RateLimit { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns true for a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if the pipeline treats this error as transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::RateLimit { .. } => true,
            Self::Api(error) => error.status_code >= 500,
            _ => false,
        }
    }

    /// Returns true when the service reports itself temporarily unavailable
    /// (502, 503 or 504).
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self.status_code(), Some(502..=504))
    }

    /// Returns the retry-after hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Creates an authentication error.
    pub fn auth(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Auth {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a deserialization error for the given body.
    pub fn deserialization(error: &serde_json::Error, body: &[u8]) -> Self {
        Self::Deserialization {
            message: error.to_string(),
            body: String::from_utf8_lossy(body).to_string(),
        }
    }
}

/// Structured error body returned by the API.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Human readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Alternate message field used by some endpoints.
    #[serde(default)]
    pub error: Option<String>,
    /// Echoed status code.
    #[serde(default)]
    pub status: Option<u16>,
    /// Machine readable code.
    #[serde(default)]
    pub code: Option<String>,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else if err.is_connect() || err.is_request() {
            NetworkErrorKind::Connection
        } else if err.is_body() || err.is_decode() {
            NetworkErrorKind::Body
        } else {
            NetworkErrorKind::Other
        };

        ClientError::Network {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

/// Extension methods for results of lookups that may legitimately 404.
pub trait ResultExt<T> {
    /// Maps a `NotFound` error to `Ok(None)`.
    ///
    /// Useful for endpoints that are absent in some environments, where a 404
    /// means "feature unavailable" rather than failure.
    fn optional(self) -> ClientResult<Option<T>>;
}

impl<T> ResultExt<T> for ClientResult<T> {
    fn optional(self) -> ClientResult<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }
}
