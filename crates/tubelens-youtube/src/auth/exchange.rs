use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tubelens_core::OAuthConfig;

use super::clock::{expiry_after, Clock};
use super::store::{CredentialStore, TokenRecord};
use crate::client::YoutubeClient;
use crate::error::YoutubeError;

/// Result of a successful authorization-code exchange. The refresh token
/// stays in the store and is deliberately absent here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeOutcome {
    pub channel_id: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Trades authorization codes for stored channel credentials.
pub struct TokenExchanger<S> {
    client: Arc<YoutubeClient>,
    oauth: OAuthConfig,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for TokenExchanger<S> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            oauth: self.oauth.clone(),
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: CredentialStore> TokenExchanger<S> {
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

    /// Exchanges `code`, resolves the owned channel, and persists the
    /// credential under that channel id.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::InvalidRequest`] if `code` or `redirect_uri` is blank.
    /// - [`YoutubeError::AuthExchangeFailed`] if the grant is refused or
    ///   unusable, or the owned-channel lookup is refused.
    /// - [`YoutubeError::NoChannelFound`] if the account owns no channel.
    /// - [`YoutubeError::StorageWriteFailed`] if the credential cannot be saved.
    pub async fn exchange(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ExchangeOutcome, YoutubeError> {
        if code.trim().is_empty() {
            return Err(YoutubeError::InvalidRequest(
                "authorization code is required".to_string(),
            ));
        }
        if redirect_uri.trim().is_empty() {
            return Err(YoutubeError::InvalidRequest(
                "redirect URI is required".to_string(),
            ));
        }

        let grant = self
            .client
            .exchange_code(&self.oauth, code, redirect_uri)
            .await?;

        if grant.expires_in <= 0 {
            return Err(unusable_grant(format!(
                "token grant has non-positive lifetime {}",
                grant.expires_in
            )));
        }
        let expires_at = expiry_after(self.clock.now(), grant.expires_in).ok_or_else(|| {
            unusable_grant(format!(
                "token grant lifetime {} is out of range",
                grant.expires_in
            ))
        })?;
        let refresh_token = grant
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unusable_grant("token grant did not include a refresh token".into()))?;

        let channel_id = self
            .client
            .owned_channel_id(&grant.access_token)
            .await
            .map_err(|e| match e {
                YoutubeError::UpstreamFetchFailed { status, detail, .. } => {
                    YoutubeError::AuthExchangeFailed { status, detail }
                }
                other => other,
            })?;

        let record = TokenRecord {
            channel_id,
            access_token: grant.access_token,
            refresh_token,
            expires_at,
        };
        self.store
            .save(&record)
            .await
            .map_err(YoutubeError::StorageWriteFailed)?;

        tracing::info!(channel_id = %record.channel_id, %expires_at, "stored channel credential");

        Ok(ExchangeOutcome {
            channel_id: record.channel_id,
            access_token: record.access_token,
            expires_at,
        })
    }
}

fn unusable_grant(detail: String) -> YoutubeError {
    YoutubeError::AuthExchangeFailed {
        status: 502,
        detail,
    }
}
