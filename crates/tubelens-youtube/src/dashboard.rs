//! The composed per-channel view: channel, recent and popular videos,
//! channel analytics, and the derived ratios.

use std::collections::BTreeMap;

use serde::Serialize;
use tubelens_core::format::{format_compact_number, format_duration, format_watch_time};
use tubelens_core::metrics::{summarize_engagement, EngagementSummary};
use tubelens_core::{AnalyticsSnapshot, Channel, Video};

use crate::auth::{CredentialStore, TokenSupplier};
use crate::client::YoutubeClient;
use crate::error::YoutubeError;

pub const RECENT_VIDEO_COUNT: u32 = 10;
pub const POPULAR_SEARCH_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub channel: Channel,
    pub videos: Vec<Video>,
    /// The first entry carries its own analytics snapshot.
    pub popular_videos: Vec<Video>,
    pub analytics: AnalyticsSnapshot,
    pub engagement: EngagementSummary,
    pub subscriber_watch_share: u32,
    pub display: DisplaySummary,
}

/// Pre-formatted strings for the headline figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplaySummary {
    pub subscribers: String,
    pub total_views: String,
    pub watch_time: String,
    /// Video id to `m:ss` or `h:mm:ss`.
    pub durations: BTreeMap<String, String>,
}

fn display_summary(
    channel: &Channel,
    videos: &[Video],
    popular_videos: &[Video],
    total_watch_minutes: u64,
) -> DisplaySummary {
    DisplaySummary {
        subscribers: format_compact_number(channel.subscriber_count),
        total_views: format_compact_number(channel.view_count),
        watch_time: format_watch_time(total_watch_minutes),
        durations: videos
            .iter()
            .chain(popular_videos)
            .map(|v| (v.id.clone(), format_duration(&v.duration)))
            .collect(),
    }
}

/// Loads everything the dashboard shows with a single supplied token.
///
/// # Errors
///
/// Returns any credential error from the supplier, and any fetch error from
/// the channel, video, or analytics calls.
pub async fn load_dashboard<S: CredentialStore>(
    client: &YoutubeClient,
    supplier: &TokenSupplier<S>,
    channel_id: &str,
) -> Result<Dashboard, YoutubeError> {
    let token = supplier.get_valid_access_token(channel_id).await?;
    let channel = client.fetch_channel(&token).await?;

    let (videos, mut popular_videos, analytics) = tokio::try_join!(
        client.fetch_videos(&token, &channel.id, RECENT_VIDEO_COUNT),
        client.fetch_popular_videos(&token, &channel.id, POPULAR_SEARCH_SIZE),
        client.fetch_channel_analytics(&token, &channel.id),
    )?;

    if let Some(top) = popular_videos.first_mut() {
        let snapshot = client
            .fetch_video_analytics(&token, &channel.id, &top.id)
            .await?;
        top.analytics = Some(snapshot);
    }

    let engagement = summarize_engagement(&videos);
    let subscriber_watch_share = analytics.subscriber_watch_share();
    let display = display_summary(
        &channel,
        &videos,
        &popular_videos,
        analytics.total_watch_minutes,
    );

    tracing::info!(
        channel_id = %channel.id,
        videos = videos.len(),
        popular = popular_videos.len(),
        "loaded dashboard"
    );

    Ok(Dashboard {
        channel,
        videos,
        popular_videos,
        analytics,
        engagement,
        subscriber_watch_share,
        display,
    })
}
