use std::net::SocketAddr;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/youtube.readonly",
    "https://www.googleapis.com/auth/yt-analytics.readonly",
    "https://www.googleapis.com/auth/userinfo.profile",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// OAuth client registration used by the token exchanger and refresher.
///
/// Passed in explicitly at construction; nothing in the workspace reads
/// OAuth settings from global state.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI used when no per-request URI is supplied.
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    /// Consent-screen endpoint for [`OAuthConfig::scope_param`] based URLs.
    pub auth_url: String,
}

impl OAuthConfig {
    /// Scopes joined the way the consent endpoint expects them.
    #[must_use]
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("auth_url", &self.auth_url)
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub oauth: OAuthConfig,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Bearer keys accepted by the HTTP service. Empty disables auth in
    /// development.
    pub api_keys: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("oauth", &self.oauth)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth() -> OAuthConfig {
        OAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "super-secret".to_string(),
            redirect_uri: "http://localhost:5173/oauth/callback".to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
        }
    }

    #[test]
    fn oauth_debug_redacts_client_secret() {
        let rendered = format!("{:?}", oauth());
        assert!(rendered.contains("client-123"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn scope_param_is_space_separated() {
        let param = oauth().scope_param();
        assert_eq!(param.split(' ').count(), 3);
        assert!(param.starts_with("https://www.googleapis.com/auth/youtube.readonly "));
    }
}
