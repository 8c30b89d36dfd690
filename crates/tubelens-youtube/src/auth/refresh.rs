use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tubelens_core::OAuthConfig;
use tubelens_db::DbError;

use super::clock::{expiry_after, Clock};
use super::store::CredentialStore;
use crate::client::YoutubeClient;
use crate::error::{FetchStage, YoutubeError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshOutcome {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Mints new access tokens from stored refresh tokens.
///
/// Two concurrent refreshes for the same channel both hit the token
/// endpoint; the last write wins.
pub struct TokenRefresher<S> {
    client: Arc<YoutubeClient>,
    oauth: OAuthConfig,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for TokenRefresher<S> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            oauth: self.oauth.clone(),
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: CredentialStore> TokenRefresher<S> {
    pub fn new(
        client: Arc<YoutubeClient>,
        oauth: OAuthConfig,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            oauth,
            store,
            clock,
        }
    }

    /// Refreshes the access token for `channel_id` and stores it. The stored
    /// refresh token is kept as is.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::NoCredential`] if no credential is stored, or it was
    ///   deleted while the refresh was in flight.
    /// - [`YoutubeError::RefreshRejected`] if the token endpoint refuses the
    ///   refresh token.
    /// - [`YoutubeError::UpstreamFetchFailed`] with [`FetchStage::TokenRefresh`]
    ///   if the endpoint fails on its side or returns an unusable lifetime.
    /// - [`YoutubeError::StorageReadFailed`] / [`YoutubeError::StorageWriteFailed`]
    ///   on persistence failures.
    pub async fn refresh(&self, channel_id: &str) -> Result<RefreshOutcome, YoutubeError> {
        let refresh_token = self
            .store
            .refresh_token(channel_id)
            .await
            .map_err(YoutubeError::StorageReadFailed)?
            .ok_or_else(|| no_credential(channel_id))?;

        let grant = self
            .client
            .refresh_access_token(&self.oauth, &refresh_token)
            .await?;

        let expires_at = expiry_after(self.clock.now(), grant.expires_in.max(0)).ok_or_else(|| {
            YoutubeError::UpstreamFetchFailed {
                stage: FetchStage::TokenRefresh,
                status: 502,
                detail: format!("token lifetime {} is out of range", grant.expires_in),
            }
        })?;
        match self
            .store
            .update_access_token(channel_id, &grant.access_token, expires_at)
            .await
        {
            Ok(()) => {}
            Err(DbError::NotFound) => return Err(no_credential(channel_id)),
            Err(e) => return Err(YoutubeError::StorageWriteFailed(e)),
        }

        tracing::info!(channel_id, %expires_at, "refreshed access token");

        Ok(RefreshOutcome {
            access_token: grant.access_token,
            expires_at,
        })
    }
}

pub(crate) fn no_credential(channel_id: &str) -> YoutubeError {
    YoutubeError::NoCredential {
        channel_id: channel_id.to_string(),
    }
}
