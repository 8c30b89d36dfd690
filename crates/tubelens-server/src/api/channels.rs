use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tubelens_core::AnalyticsSnapshot;
use tubelens_youtube::{ensure_available, load_dashboard, Dashboard, YoutubeError};

use crate::middleware::RequestId;

use super::{map_db_error, map_youtube_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyticsQuery {
    /// When set, an unusable reporting API is an error instead of an empty
    /// snapshot.
    #[serde(default)]
    strict: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedData {
    channel_id: String,
    deleted: bool,
}

pub(super) async fn delete_credential(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(channel_id): Path<String>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    let deleted = tubelens_db::delete_token(&state.pool, &channel_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !deleted {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no stored credential for channel {channel_id}"),
        ));
    }

    tracing::info!(channel_id = %channel_id, "deleted channel credential");
    Ok(Json(ApiResponse::new(
        req_id.0,
        DeletedData {
            channel_id,
            deleted,
        },
    )))
}

pub(super) async fn dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(channel_id): Path<String>,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    let dashboard = load_dashboard(&state.youtube, &state.supplier, &channel_id)
        .await
        .map_err(|e| map_youtube_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, dashboard)))
}

pub(super) async fn channel_analytics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(channel_id): Path<String>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<AnalyticsSnapshot>>, ApiError> {
    let snapshot = load_analytics(&state, &channel_id, None, query.strict)
        .await
        .map_err(|e| map_youtube_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, snapshot)))
}

pub(super) async fn video_analytics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((channel_id, video_id)): Path<(String, String)>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<ApiResponse<AnalyticsSnapshot>>, ApiError> {
    let snapshot = load_analytics(&state, &channel_id, Some(&video_id), query.strict)
        .await
        .map_err(|e| map_youtube_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, snapshot)))
}

async fn load_analytics(
    state: &AppState,
    channel_id: &str,
    video_id: Option<&str>,
    strict: bool,
) -> Result<AnalyticsSnapshot, YoutubeError> {
    let token = state.supplier.get_valid_access_token(channel_id).await?;
    let snapshot = match video_id {
        Some(video_id) => {
            state
                .youtube
                .fetch_video_analytics(&token, channel_id, video_id)
                .await?
        }
        None => {
            state
                .youtube
                .fetch_channel_analytics(&token, channel_id)
                .await?
        }
    };

    if strict {
        ensure_available(snapshot)
    } else {
        Ok(snapshot)
    }
}
