//! Shared fixtures: an in-memory credential store, a pinned clock, and a
//! client pointed at a wiremock server.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use tubelens_core::OAuthConfig;
use tubelens_db::{CachedAccessToken, DbError};
use tubelens_youtube::{
    Clock, CredentialStore, FixedClock, TokenExchanger, TokenRecord, TokenRefresher,
    TokenSupplier, YoutubeClient,
};
use wiremock::MockServer;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, TokenRecord>>,
}

impl MemoryStore {
    pub fn with_record(record: TokenRecord) -> Self {
        let store = Self::default();
        store
            .records
            .lock()
            .expect("lock")
            .insert(record.channel_id.clone(), record);
        store
    }

    pub fn get(&self, channel_id: &str) -> Option<TokenRecord> {
        self.records.lock().expect("lock").get(channel_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("lock").len()
    }
}

impl CredentialStore for MemoryStore {
    async fn save(&self, record: &TokenRecord) -> Result<(), DbError> {
        self.records
            .lock()
            .expect("lock")
            .insert(record.channel_id.clone(), record.clone());
        Ok(())
    }

    async fn access_token(&self, channel_id: &str) -> Result<Option<CachedAccessToken>, DbError> {
        Ok(self.get(channel_id).map(|r| CachedAccessToken {
            access_token: r.access_token,
            token_expiry: r.expires_at,
        }))
    }

    async fn refresh_token(&self, channel_id: &str) -> Result<Option<String>, DbError> {
        Ok(self.get(channel_id).map(|r| r.refresh_token))
    }

    async fn update_access_token(
        &self,
        channel_id: &str,
        access_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let mut records = self.records.lock().expect("lock");
        let record = records.get_mut(channel_id).ok_or(DbError::NotFound)?;
        record.access_token = access_token.to_string();
        record.expires_at = expires_at;
        Ok(())
    }

    async fn delete(&self, channel_id: &str) -> Result<bool, DbError> {
        Ok(self
            .records
            .lock()
            .expect("lock")
            .remove(channel_id)
            .is_some())
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(now()))
}

pub fn oauth_config() -> OAuthConfig {
    OAuthConfig {
        client_id: "client-123".to_string(),
        client_secret: "secret-456".to_string(),
        redirect_uri: "http://localhost:5173/oauth/callback".to_string(),
        scopes: vec!["https://www.googleapis.com/auth/youtube.readonly".to_string()],
        auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
    }
}

pub fn test_client(server: &MockServer) -> Arc<YoutubeClient> {
    let uri = server.uri();
    let client = YoutubeClient::with_base_urls(
        5,
        "tubelens-test",
        &format!("{uri}/token"),
        &format!("{uri}/youtube/v3"),
        &format!("{uri}/v2"),
    )
    .expect("client construction should not fail");
    Arc::new(client)
}

pub fn record(channel_id: &str, access: &str, expires_at: DateTime<Utc>) -> TokenRecord {
    TokenRecord {
        channel_id: channel_id.to_string(),
        access_token: access.to_string(),
        refresh_token: format!("refresh-for-{channel_id}"),
        expires_at,
    }
}

pub struct Credentials {
    pub store: Arc<MemoryStore>,
    pub exchanger: TokenExchanger<MemoryStore>,
    pub refresher: TokenRefresher<MemoryStore>,
    pub supplier: TokenSupplier<MemoryStore>,
}

pub fn credentials(server: &MockServer, store: MemoryStore) -> Credentials {
    let client = test_client(server);
    let store = Arc::new(store);
    let refresher = TokenRefresher::new(
        Arc::clone(&client),
        oauth_config(),
        Arc::clone(&store),
        clock(),
    );
    Credentials {
        exchanger: TokenExchanger::new(client, oauth_config(), Arc::clone(&store), clock()),
        supplier: TokenSupplier::new(Arc::clone(&store), refresher.clone(), clock()),
        refresher,
        store,
    }
}
