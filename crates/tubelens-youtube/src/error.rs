use std::fmt;

use thiserror::Error;
use tubelens_db::DbError;

/// Which upstream call a fetch failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    ChannelLookup,
    Search,
    VideoDetails,
    /// The token endpoint failed on its side while refreshing.
    TokenRefresh,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::ChannelLookup => write!(f, "channel lookup"),
            FetchStage::Search => write!(f, "video search"),
            FetchStage::VideoDetails => write!(f, "video details"),
            FetchStage::TokenRefresh => write!(f, "token refresh"),
        }
    }
}

/// Errors returned by the credential lifecycle, fetchers, and aggregator.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A 2xx response body did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Caller input rejected before any network call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The provider refused the authorization code, or answered with a grant
    /// that cannot be stored. `status` is the upstream HTTP status, or 502
    /// when a 2xx grant was unusable.
    #[error("authorization code exchange failed (HTTP {status}): {detail}")]
    AuthExchangeFailed { status: u16, detail: String },

    #[error("no channel found for this account")]
    NoChannelFound,

    #[error("no stored credential for channel {channel_id}")]
    NoCredential { channel_id: String },

    /// The stored refresh token was revoked or expired. Only 4xx answers
    /// other than 429 land here.
    #[error("refresh token rejected (HTTP {status}): {detail}")]
    RefreshRejected { status: u16, detail: String },

    #[error("{stage} failed (HTTP {status}): {detail}")]
    UpstreamFetchFailed {
        stage: FetchStage,
        status: u16,
        detail: String,
    },

    #[error("failed to store credential: {0}")]
    StorageWriteFailed(#[source] DbError),

    #[error("failed to read credential: {0}")]
    StorageReadFailed(#[source] DbError),

    /// The analytics reporting API is not enabled for the OAuth project.
    #[error("analytics reporting is not enabled for this project")]
    AnalyticsUnavailable,
}

impl YoutubeError {
    /// `true` when the user must go through the consent screen again.
    #[must_use]
    pub fn requires_reauthorization(&self) -> bool {
        matches!(
            self,
            YoutubeError::NoCredential { .. } | YoutubeError::RefreshRejected { .. }
        )
    }

    /// `true` when a manual retry of the same action might succeed.
    #[must_use]
    pub fn is_retryable_by_user(&self) -> bool {
        match self {
            YoutubeError::Http(_)
            | YoutubeError::StorageWriteFailed(_)
            | YoutubeError::StorageReadFailed(_) => true,
            YoutubeError::UpstreamFetchFailed { status, .. }
            | YoutubeError::AuthExchangeFailed { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }

    /// Upstream HTTP status and detail, for errors that carry them.
    #[must_use]
    pub fn upstream_failure(&self) -> Option<(u16, &str)> {
        match self {
            YoutubeError::AuthExchangeFailed { status, detail }
            | YoutubeError::RefreshRejected { status, detail }
            | YoutubeError::UpstreamFetchFailed { status, detail, .. } => {
                Some((*status, detail.as_str()))
            }
            _ => None,
        }
    }

    /// One sentence suitable for showing to the channel owner.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            YoutubeError::Http(_) => {
                "Could not reach YouTube. Check your connection and try again.".to_string()
            }
            YoutubeError::Deserialize { .. } | YoutubeError::InvalidBaseUrl { .. } => {
                "YouTube returned an unexpected response.".to_string()
            }
            YoutubeError::InvalidRequest(reason) => format!("Invalid request: {reason}."),
            YoutubeError::AuthExchangeFailed { .. } => {
                "Failed to connect your YouTube account. Please try again.".to_string()
            }
            YoutubeError::NoChannelFound => {
                "No YouTube channel was found for this account.".to_string()
            }
            YoutubeError::NoCredential { .. } | YoutubeError::RefreshRejected { .. } => {
                "Your YouTube connection has expired. Please reconnect your channel.".to_string()
            }
            YoutubeError::UpstreamFetchFailed { stage, .. } => {
                format!("Failed to load data from YouTube ({stage}).")
            }
            YoutubeError::StorageWriteFailed(_) | YoutubeError::StorageReadFailed(_) => {
                "Failed to access saved credentials.".to_string()
            }
            YoutubeError::AnalyticsUnavailable => {
                "YouTube Analytics API is not enabled for this project.".to_string()
            }
        }
    }
}

/// Upstream statuses that describe the provider's state rather than the
/// request: throttling and server errors.
#[must_use]
pub(crate) fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_rejection_requires_reauthorization() {
        let err = YoutubeError::RefreshRejected {
            status: 400,
            detail: "invalid_grant".to_string(),
        };
        assert!(err.requires_reauthorization());
        assert!(!err.is_retryable_by_user());
    }

    #[test]
    fn server_side_fetch_failures_are_retryable() {
        let err = YoutubeError::UpstreamFetchFailed {
            stage: FetchStage::Search,
            status: 503,
            detail: "backend error".to_string(),
        };
        assert!(err.is_retryable_by_user());
        assert!(!err.requires_reauthorization());
        assert_eq!(err.user_message(), "Failed to load data from YouTube (video search).");
    }

    #[test]
    fn forbidden_fetch_is_not_retryable() {
        let err = YoutubeError::UpstreamFetchFailed {
            stage: FetchStage::VideoDetails,
            status: 403,
            detail: "quotaExceeded".to_string(),
        };
        assert!(!err.is_retryable_by_user());
    }

    #[test]
    fn exchange_outage_is_retryable_but_rejection_is_not() {
        let outage = YoutubeError::AuthExchangeFailed {
            status: 503,
            detail: "backend_error".to_string(),
        };
        assert!(outage.is_retryable_by_user());
        assert!(!outage.requires_reauthorization());

        let rejected = YoutubeError::AuthExchangeFailed {
            status: 400,
            detail: "invalid_grant".to_string(),
        };
        assert!(!rejected.is_retryable_by_user());
    }

    #[test]
    fn token_refresh_outage_keeps_the_connection() {
        let err = YoutubeError::UpstreamFetchFailed {
            stage: FetchStage::TokenRefresh,
            status: 503,
            detail: "backend_error".to_string(),
        };
        assert!(err.is_retryable_by_user());
        assert!(!err.requires_reauthorization());
        assert_eq!(err.to_string(), "token refresh failed (HTTP 503): backend_error");
    }

    #[test]
    fn upstream_failure_exposes_status_and_detail() {
        let err = YoutubeError::RefreshRejected {
            status: 401,
            detail: "invalid_client".to_string(),
        };
        assert_eq!(err.upstream_failure(), Some((401, "invalid_client")));
        assert_eq!(YoutubeError::NoChannelFound.upstream_failure(), None);
    }

    #[test]
    fn display_includes_stage_and_status() {
        let err = YoutubeError::UpstreamFetchFailed {
            stage: FetchStage::VideoDetails,
            status: 404,
            detail: "gone".to_string(),
        };
        assert_eq!(err.to_string(), "video details failed (HTTP 404): gone");
    }
}
