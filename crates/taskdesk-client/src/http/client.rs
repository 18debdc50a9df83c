/*
[INPUT]:  HTTP configuration (base URL, timeouts) and session tokens
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::SessionToken;
use crate::http::request_id::REQUEST_ID_HEADER;
use crate::http::{ApiError, RequestIds, Result};
use crate::types::SaveAck;

/// Default base URL of the task API
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Main HTTP client for the task API
#[derive(Debug, Clone)]
pub struct TaskdeskClient {
    http_client: Client,
    base_url: Url,
    timeout: Duration,
    request_ids: RequestIds,
}

impl TaskdeskClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a new client pointed at a specific API root
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(base_url)?,
            timeout: config.timeout,
            request_ids: RequestIds::new(),
        })
    }

    /// API root every endpoint is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint relative to the API root
    ///
    /// Each segment is percent-encoded on its own, so '/', '?' and '#' inside
    /// a segment never change which resource is addressed.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        append_segments(&mut url, segments)?;
        Ok(url)
    }

    /// Build an authenticated request builder
    ///
    /// The session token is sent verbatim in the `Authorization` header.
    pub(crate) fn authed_request(
        &self,
        method: Method,
        segments: &[&str],
        token: &SessionToken,
    ) -> Result<RequestBuilder> {
        let url = self.endpoint_url(segments)?;
        let request_id = self.request_ids.next_id();
        debug!(%method, %url, request_id = %request_id, "building request");
        Ok(self
            .http_client
            .request(method, url)
            .header(AUTHORIZATION, token.as_str())
            .header(REQUEST_ID_HEADER, request_id))
    }

    /// Send a request and decode a JSON success body
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let body = self.send_checked(builder).await?;
        serde_json::from_str(&body).map_err(|err| {
            warn!(error = %err, "response body did not match expected shape");
            ApiError::InvalidResponse(format!("unexpected response body: {err}"))
        })
    }

    /// Send a write request whose success body is informational only
    ///
    /// Empty or non-JSON bodies are accepted and produce an empty ack.
    pub(crate) async fn send_ack(&self, builder: RequestBuilder) -> Result<SaveAck> {
        let body = self.send_checked(builder).await?;
        if body.trim().is_empty() {
            return Ok(SaveAck::default());
        }
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn send_checked(&self, builder: RequestBuilder) -> Result<String> {
        let response = builder.send().await.map_err(|err| self.transport_error(err))?;
        let status = response.status();
        if status.is_success() {
            return response.text().await.map_err(|err| self.transport_error(err));
        }
        Err(error_from_response(response).await)
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            warn!(timeout_secs = self.timeout.as_secs(), "request timed out");
            ApiError::Timeout {
                duration: self.timeout.as_secs(),
            }
        } else {
            warn!(error = %err, "request failed");
            ApiError::Http(err)
        }
    }
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    warn!(status = status.as_u16(), message = %message, "API returned error status");

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Authentication { message },
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit {
            retry_after: retry_after.unwrap_or(1),
        },
        _ => ApiError::api_error(status, message),
    }
}

/// Extract the human readable message from an error body
///
/// Prefers the backend's `msg` field, then `message`, then the raw text.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message"] {
            if let Some(message) = value.get(key).and_then(|value| value.as_str()) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Append path segments below `url`, escaping each one
///
/// Empty, "." and ".." segments are rejected; they would address a different
/// resource than the one named.
pub(crate) fn append_segments(url: &mut Url, segments: &[&str]) -> Result<()> {
    if let Some(bad) = segments
        .iter()
        .find(|segment| matches!(**segment, "" | "." | ".."))
    {
        return Err(ApiError::InvalidPathSegment(bad.to_string()));
    }
    url.path_segments_mut()
        .map_err(|_| ApiError::Config("URL cannot carry paths".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(())
}

fn normalize_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(ApiError::Config(format!(
            "base URL cannot carry paths: {base_url}"
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
