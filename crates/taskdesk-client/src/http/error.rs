/*
[INPUT]:  Error sources (HTTP, API, URL, auth, configuration)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the taskdesk client
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// Server rejected the session credential
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session token is expired
    #[error("Session token expired, please sign in again")]
    TokenExpired,

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Path segment would escape the addressed resource
    #[error("Invalid path segment: '{0}'")]
    InvalidPathSegment(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    /// Request timeout
    #[error("Request timeout after {duration}s")]
    Timeout { duration: u64 },
}

impl ApiError {
    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Authentication { .. } | ApiError::TokenExpired
        )
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }
}

/// Result type alias for taskdesk client operations
pub type Result<T> = std::result::Result<T, ApiError>;
