use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tubelens_youtube::{ExchangeOutcome, RefreshOutcome};

use crate::middleware::RequestId;

use super::{map_youtube_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AuthorizeUrlQuery {
    state: Option<String>,
    redirect_uri: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct AuthorizeUrlData {
    url: String,
}

/// Missing fields deserialize as empty strings so they surface as
/// `bad_request` rather than a JSON rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ExchangeRequest {
    #[serde(default)]
    code: String,
    #[serde(default)]
    redirect_uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RefreshRequest {
    #[serde(default)]
    channel_id: String,
}

pub(super) async fn authorize_url(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AuthorizeUrlQuery>,
) -> Result<Json<ApiResponse<AuthorizeUrlData>>, ApiError> {
    let url = tubelens_youtube::authorize_url(
        &state.oauth,
        query.redirect_uri.as_deref(),
        query.state.as_deref(),
    )
    .map_err(|e| map_youtube_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(
        req_id.0,
        AuthorizeUrlData {
            url: url.to_string(),
        },
    )))
}

pub(super) async fn exchange(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ExchangeRequest>,
) -> Result<Json<ApiResponse<ExchangeOutcome>>, ApiError> {
    let outcome = state
        .exchanger
        .exchange(&body.code, &body.redirect_uri)
        .await
        .map_err(|e| map_youtube_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, outcome)))
}

pub(super) async fn refresh(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshOutcome>>, ApiError> {
    if body.channel_id.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "channelId is required",
        ));
    }

    let outcome = state
        .refresher
        .refresh(&body.channel_id)
        .await
        .map_err(|e| map_youtube_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, outcome)))
}
