//! Database operations for the `youtube_tokens` table.
//!
//! One row per channel. Reads are split so that callers needing only the
//! access token never load the refresh token.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// Access token plus expiry, as read by the token supplier.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CachedAccessToken {
    pub access_token: String,
    pub token_expiry: DateTime<Utc>,
}

/// Full credential written after an authorization-code exchange.
#[derive(Debug, Clone, Copy)]
pub struct NewToken<'a> {
    pub channel_id: &'a str,
    pub access_token: &'a str,
    pub refresh_token: &'a str,
    pub token_expiry: DateTime<Utc>,
}

/// Inserts or overwrites the credential for `token.channel_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn upsert_token(pool: &PgPool, token: &NewToken<'_>) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO youtube_tokens (channel_id, access_token, refresh_token, token_expiry, updated_at) \
         VALUES ($1, $2, $3, $4, NOW()) \
         ON CONFLICT (channel_id) DO UPDATE SET \
             access_token = EXCLUDED.access_token, \
             refresh_token = EXCLUDED.refresh_token, \
             token_expiry = EXCLUDED.token_expiry, \
             updated_at = NOW()",
    )
    .bind(token.channel_id)
    .bind(token.access_token)
    .bind(token.refresh_token)
    .bind(token.token_expiry)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns the cached access token and its expiry, if a credential exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_access_token(
    pool: &PgPool,
    channel_id: &str,
) -> Result<Option<CachedAccessToken>, DbError> {
    let row = sqlx::query_as::<_, CachedAccessToken>(
        "SELECT access_token, token_expiry FROM youtube_tokens WHERE channel_id = $1",
    )
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the stored refresh token, if a credential exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_refresh_token(pool: &PgPool, channel_id: &str) -> Result<Option<String>, DbError> {
    let token = sqlx::query_scalar::<_, String>(
        "SELECT refresh_token FROM youtube_tokens WHERE channel_id = $1",
    )
    .bind(channel_id)
    .fetch_optional(pool)
    .await?;

    Ok(token)
}

/// Replaces the access token and expiry after a refresh. The refresh token
/// column is left untouched.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no credential exists for `channel_id`,
/// or [`DbError::Sqlx`] if the query fails.
pub async fn update_access_token(
    pool: &PgPool,
    channel_id: &str,
    access_token: &str,
    token_expiry: DateTime<Utc>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE youtube_tokens \
         SET access_token = $2, token_expiry = $3, updated_at = NOW() \
         WHERE channel_id = $1",
    )
    .bind(channel_id)
    .bind(access_token)
    .bind(token_expiry)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Removes the credential for `channel_id`. Returns `true` if a row was deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_token(pool: &PgPool, channel_id: &str) -> Result<bool, DbError> {
    let result = sqlx::query("DELETE FROM youtube_tokens WHERE channel_id = $1")
        .bind(channel_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
