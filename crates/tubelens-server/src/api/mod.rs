mod channels;
mod oauth;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tubelens_core::OAuthConfig;
use tubelens_youtube::{
    Clock, TokenExchanger, TokenRefresher, TokenSupplier, YoutubeClient, YoutubeError,
};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub youtube: Arc<YoutubeClient>,
    pub oauth: OAuthConfig,
    pub exchanger: TokenExchanger<PgPool>,
    pub refresher: TokenRefresher<PgPool>,
    pub supplier: TokenSupplier<PgPool>,
}

impl AppState {
    /// Wires the credential services around one shared pool and client.
    pub fn new(
        pool: PgPool,
        youtube: Arc<YoutubeClient>,
        oauth: OAuthConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = Arc::new(pool.clone());
        let refresher = TokenRefresher::new(
            Arc::clone(&youtube),
            oauth.clone(),
            Arc::clone(&store),
            Arc::clone(&clock),
        );
        Self {
            exchanger: TokenExchanger::new(
                Arc::clone(&youtube),
                oauth.clone(),
                Arc::clone(&store),
                Arc::clone(&clock),
            ),
            supplier: TokenSupplier::new(store, refresher.clone(), clock),
            refresher,
            pool,
            youtube,
            oauth,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// HTTP status returned by Google, when the failure came from upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_detail: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

fn status_for_code(code: &str) -> StatusCode {
    match code {
        "not_found" | "no_channel" => StatusCode::NOT_FOUND,
        "unauthorized" | "reauthorization_required" => StatusCode::UNAUTHORIZED,
        "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
        "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
        "upstream_error" | "auth_exchange_failed" => StatusCode::BAD_GATEWAY,
        "analytics_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let code = code.into();
        Self {
            status: status_for_code(&code),
            error: ErrorBody {
                code,
                message: message.into(),
                upstream_status: None,
                upstream_detail: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Maps a core error onto the HTTP error envelope. Upstream 4xx refusals of
/// a code exchange surface as 400; upstream 5xx as 502. Upstream status and
/// detail are attached when the error carries them.
pub(super) fn map_youtube_error(request_id: String, error: &YoutubeError) -> ApiError {
    let mut api = classify_youtube_error(request_id, error);
    if let Some((status, detail)) = error.upstream_failure() {
        api.error.upstream_status = Some(status);
        api.error.upstream_detail = Some(detail.to_string());
    }
    api
}

fn classify_youtube_error(request_id: String, error: &YoutubeError) -> ApiError {
    let message = error.user_message();
    match error {
        YoutubeError::InvalidRequest(_) => ApiError::new(request_id, "bad_request", message),
        YoutubeError::AuthExchangeFailed { status, .. } => {
            tracing::warn!(error = %error, "authorization code exchange failed");
            let api = ApiError::new(request_id, "auth_exchange_failed", message);
            if (400..500).contains(status) {
                api.with_status(StatusCode::BAD_REQUEST)
            } else {
                api
            }
        }
        YoutubeError::NoChannelFound => ApiError::new(request_id, "no_channel", message),
        YoutubeError::NoCredential { .. } | YoutubeError::RefreshRejected { .. } => {
            tracing::info!(error = %error, "channel must re-authorize");
            ApiError::new(request_id, "reauthorization_required", message)
        }
        YoutubeError::UpstreamFetchFailed { status, .. } => {
            tracing::warn!(error = %error, "upstream fetch failed");
            let api = ApiError::new(request_id, "upstream_error", message);
            if *status == 429 {
                api.with_status(StatusCode::TOO_MANY_REQUESTS)
            } else {
                api
            }
        }
        YoutubeError::Http(_) | YoutubeError::Deserialize { .. } => {
            tracing::warn!(error = %error, "upstream request failed");
            ApiError::new(request_id, "upstream_error", message)
        }
        YoutubeError::AnalyticsUnavailable => {
            ApiError::new(request_id, "analytics_unavailable", message)
        }
        YoutubeError::StorageWriteFailed(_)
        | YoutubeError::StorageReadFailed(_)
        | YoutubeError::InvalidBaseUrl { .. } => {
            tracing::error!(error = %error, "internal failure");
            ApiError::new(request_id, "internal_error", message)
        }
    }
}

pub(super) fn map_db_error(request_id: String, error: &tubelens_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/oauth/authorize-url", get(oauth::authorize_url))
        .route("/api/v1/oauth/exchange", post(oauth::exchange))
        .route("/api/v1/oauth/refresh", post(oauth::refresh))
        .route(
            "/api/v1/channels/{channel_id}/credential",
            delete(channels::delete_credential),
        )
        .route(
            "/api/v1/channels/{channel_id}/dashboard",
            get(channels::dashboard),
        )
        .route(
            "/api/v1/channels/{channel_id}/analytics",
            get(channels::channel_analytics),
        )
        .route(
            "/api/v1/channels/{channel_id}/videos/{video_id}/analytics",
            get(channels::video_analytics),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match tubelens_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
