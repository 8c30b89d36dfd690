//! Persistence seam for channel credentials.
//!
//! [`CredentialStore`] is implemented for [`PgPool`] by delegating to the
//! `tubelens-db` queries. Tests substitute an in-memory store.

use std::future::Future;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tubelens_db::{CachedAccessToken, DbError, NewToken};

/// Full credential written after an authorization-code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub channel_id: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("channel_id", &self.channel_id)
            .field("access_token", &"[redacted]")
            .field("refresh_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Storage for one credential per channel.
///
/// Implementations must keep the refresh token untouched in
/// [`CredentialStore::update_access_token`] and report a missing row there as
/// [`DbError::NotFound`].
pub trait CredentialStore: Send + Sync {
    /// Inserts or replaces the credential for `record.channel_id`.
    fn save(&self, record: &TokenRecord) -> impl Future<Output = Result<(), DbError>> + Send;

    fn access_token(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = Result<Option<CachedAccessToken>, DbError>> + Send;

    fn refresh_token(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = Result<Option<String>, DbError>> + Send;

    fn update_access_token(
        &self,
        channel_id: &str,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Removes the credential. Returns `true` if one existed.
    fn delete(&self, channel_id: &str) -> impl Future<Output = Result<bool, DbError>> + Send;
}

impl CredentialStore for PgPool {
    async fn save(&self, record: &TokenRecord) -> Result<(), DbError> {
        let token = NewToken {
            channel_id: &record.channel_id,
            access_token: &record.access_token,
            refresh_token: &record.refresh_token,
            token_expiry: record.expires_at,
        };
        tubelens_db::upsert_token(self, &token).await
    }

    async fn access_token(&self, channel_id: &str) -> Result<Option<CachedAccessToken>, DbError> {
        tubelens_db::get_access_token(self, channel_id).await
    }

    async fn refresh_token(&self, channel_id: &str) -> Result<Option<String>, DbError> {
        tubelens_db::get_refresh_token(self, channel_id).await
    }

    async fn update_access_token(
        &self,
        channel_id: &str,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        tubelens_db::update_access_token(self, channel_id, access_token, expires_at).await
    }

    async fn delete(&self, channel_id: &str) -> Result<bool, DbError> {
        tubelens_db::delete_token(self, channel_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_tokens() {
        let record = TokenRecord {
            channel_id: "UC1".to_string(),
            access_token: "ya29.secret".to_string(),
            refresh_token: "1//refresh".to_string(),
            expires_at: Utc::now(),
        };
        let rendered = format!("{record:?}");
        assert!(rendered.contains("UC1"));
        assert!(!rendered.contains("ya29.secret"));
        assert!(!rendered.contains("1//refresh"));
    }
}
