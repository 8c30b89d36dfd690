//! HTTP client shared by the OAuth token calls, the Data API fetchers, and
//! the Analytics report runner.
//!
//! Holds one `reqwest::Client` and three base URLs. Use
//! [`YoutubeClient::new`] for production or [`YoutubeClient::with_base_urls`]
//! to point every endpoint at a mock server in tests.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::{FetchStage, YoutubeError};

const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_DATA_API_URL: &str = "https://www.googleapis.com/youtube/v3/";
const DEFAULT_ANALYTICS_API_URL: &str = "https://youtubeanalytics.googleapis.com/v2/";

/// Longest upstream error body carried into an error value.
const MAX_ERROR_DETAIL_CHARS: usize = 300;

/// Client for the Google token endpoint and the two `YouTube` APIs.
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    client: Client,
    token_url: Url,
    data_api_url: Url,
    analytics_api_url: Url,
}

impl YoutubeClient {
    /// Creates a client pointed at the production Google endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, YoutubeError> {
        Self::with_base_urls(
            timeout_secs,
            user_agent,
            DEFAULT_TOKEN_URL,
            DEFAULT_DATA_API_URL,
            DEFAULT_ANALYTICS_API_URL,
        )
    }

    /// Creates a client with custom endpoints (for testing with wiremock).
    ///
    /// `token_url` is used verbatim. The two API bases are normalised to end
    /// with exactly one slash so resource names join beneath them.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`YoutubeError::InvalidBaseUrl`] if any URL is invalid.
    pub fn with_base_urls(
        timeout_secs: u64,
        user_agent: &str,
        token_url: &str,
        data_api_url: &str,
        analytics_api_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            token_url: parse_url(token_url)?,
            data_api_url: parse_base_url(data_api_url)?,
            analytics_api_url: parse_base_url(analytics_api_url)?,
        })
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Builds `<data api>/<resource>?k=v&...`.
    pub(crate) fn data_url(&self, resource: &str, params: &[(&str, &str)]) -> Url {
        build_url(&self.data_api_url, resource, params)
    }

    /// Builds `<analytics api>/<resource>?k=v&...`.
    pub(crate) fn analytics_url(&self, resource: &str, params: &[(&str, &str)]) -> Url {
        build_url(&self.analytics_api_url, resource, params)
    }

    /// Sends an authenticated GET and returns the raw response, whatever its
    /// status.
    pub(crate) async fn send_authorized(
        &self,
        url: &Url,
        access_token: &str,
    ) -> Result<Response, YoutubeError> {
        let response = self
            .client
            .get(url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;
        Ok(response)
    }

    /// Sends an authenticated GET and decodes a 2xx body into `T`.
    ///
    /// A non-2xx status becomes [`YoutubeError::UpstreamFetchFailed`] tagged
    /// with `stage`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        access_token: &str,
        stage: FetchStage,
    ) -> Result<T, YoutubeError> {
        let response = self.send_authorized(url, access_token).await?;
        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response).await;
            tracing::warn!(%stage, status = status.as_u16(), %detail, "upstream request failed");
            return Err(YoutubeError::UpstreamFetchFailed {
                stage,
                status: status.as_u16(),
                detail,
            });
        }

        decode_json(response, &stage.to_string()).await
    }
}

/// Reads a 2xx body and decodes it, tagging decode failures with `context`.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: Response,
    context: &str,
) -> Result<T, YoutubeError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// Extracts a short human-readable reason from an error response.
///
/// Understands the Google API envelope (`{"error":{"message":..}}`) and the
/// OAuth envelope (`{"error":..,"error_description":..}`); anything else is
/// returned as truncated text.
pub(crate) async fn error_detail(response: Response) -> String {
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return format!("unreadable error body: {e}"),
    };
    detail_from_body(&body)
}

fn detail_from_body(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.pointer("/error/message").and_then(|v| v.as_str()) {
            return message.to_string();
        }
        if let Some(description) = value.get("error_description").and_then(|v| v.as_str()) {
            return description.to_string();
        }
        if let Some(code) = value.get("error").and_then(|v| v.as_str()) {
            return code.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_DETAIL_CHARS).collect()
}

fn build_url(base: &Url, resource: &str, params: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    // Bases are always http(s), so the URL can carry path segments.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(resource);
    }
    {
        let mut pairs = url.query_pairs_mut();
        for (k, v) in params {
            pairs.append_pair(k, v);
        }
    }
    url
}

fn parse_url(raw: &str) -> Result<Url, YoutubeError> {
    Url::parse(raw).map_err(|e| YoutubeError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_base_url(raw: &str) -> Result<Url, YoutubeError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    parse_url(&normalised)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
