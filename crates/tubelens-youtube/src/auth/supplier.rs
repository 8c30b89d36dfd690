use std::sync::Arc;

use chrono::Duration;

use super::clock::Clock;
use super::refresh::{no_credential, TokenRefresher};
use super::store::CredentialStore;
use crate::error::YoutubeError;

/// Tokens expiring within this window are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// Hands out access tokens that are valid for at least
/// [`REFRESH_MARGIN_SECS`], refreshing at most once per call.
pub struct TokenSupplier<S> {
    store: Arc<S>,
    refresher: TokenRefresher<S>,
    clock: Arc<dyn Clock>,
}

impl<S> Clone for TokenSupplier<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            refresher: self.refresher.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: CredentialStore> TokenSupplier<S> {
    pub fn new(store: Arc<S>, refresher: TokenRefresher<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            refresher,
            clock,
        }
    }

    /// Returns a usable access token for `channel_id`.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::NoCredential`] if nothing is stored for the channel.
    /// - [`YoutubeError::StorageReadFailed`] if the store cannot be read.
    /// - Any error from [`TokenRefresher::refresh`] when a refresh is needed.
    pub async fn get_valid_access_token(&self, channel_id: &str) -> Result<String, YoutubeError> {
        let cached = self
            .store
            .access_token(channel_id)
            .await
            .map_err(YoutubeError::StorageReadFailed)?
            .ok_or_else(|| no_credential(channel_id))?;

        let threshold = self.clock.now() + Duration::seconds(REFRESH_MARGIN_SECS);
        if cached.token_expiry > threshold {
            tracing::debug!(channel_id, expires_at = %cached.token_expiry, "using cached access token");
            return Ok(cached.access_token);
        }

        tracing::debug!(channel_id, expires_at = %cached.token_expiry, "access token near expiry; refreshing");
        let outcome = self.refresher.refresh(channel_id).await?;
        Ok(outcome.access_token)
    }
}
