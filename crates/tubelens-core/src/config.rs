use crate::app_config::{AppConfig, Environment, OAuthConfig, DEFAULT_AUTH_URL, DEFAULT_SCOPES};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let client_id = require("YOUTUBE_CLIENT_ID")?;
    let client_secret = require("YOUTUBE_CLIENT_SECRET")?;

    let env = parse_environment(&or_default("TUBELENS_ENV", "development"))?;

    let bind_addr = or_default("TUBELENS_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TUBELENS_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TUBELENS_LOG_LEVEL", "info");

    let redirect_uri = or_default(
        "YOUTUBE_REDIRECT_URI",
        "http://localhost:5173/oauth/callback",
    );
    let scopes = parse_list(&or_default("YOUTUBE_OAUTH_SCOPES", &DEFAULT_SCOPES.join(" ")));
    if scopes.is_empty() {
        return Err(invalid(
            "YOUTUBE_OAUTH_SCOPES",
            "at least one scope is required".to_string(),
        ));
    }

    let db_max_connections = parse_u32("TUBELENS_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TUBELENS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TUBELENS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let http_timeout_secs = parse_u64("TUBELENS_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TUBELENS_USER_AGENT", "tubelens/0.1 (channel-analytics)");
    let api_keys = parse_list(&or_default("TUBELENS_API_KEYS", ""));

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        oauth: OAuthConfig {
            client_id,
            client_secret,
            redirect_uri,
            scopes,
            auth_url: DEFAULT_AUTH_URL.to_string(),
        },
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        http_timeout_secs,
        user_agent,
        api_keys,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TUBELENS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Splits a list on whitespace or commas, dropping empties.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
