//! Ratios derived from already-normalized records.

use serde::{Deserialize, Serialize};

use crate::model::Video;

/// Totals and rates over a list of videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSummary {
    pub total_views: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub average_views_per_video: f64,
    /// `(likes + comments) / views * 100`, rounded to 2 decimals; 0 without views.
    pub engagement_rate: f64,
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_engagement(videos: &[Video]) -> EngagementSummary {
    let total_views: u64 = videos.iter().map(|v| v.view_count).sum();
    let total_likes: u64 = videos.iter().map(|v| v.like_count).sum();
    let total_comments: u64 = videos.iter().map(|v| v.comment_count).sum();

    let average_views_per_video = if videos.is_empty() {
        0.0
    } else {
        total_views as f64 / videos.len() as f64
    };
    let engagement_rate = if total_views == 0 {
        0.0
    } else {
        round_to((total_likes + total_comments) as f64 / total_views as f64 * 100.0, 2)
    };

    EngagementSummary {
        total_views,
        total_likes,
        total_comments,
        average_views_per_video,
        engagement_rate,
    }
}

/// Subscriber share of total watch time as a whole percentage, capped at 100.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn subscriber_watch_share(subscriber_minutes: u64, total_minutes: u64) -> u32 {
    if total_minutes == 0 {
        return 0;
    }
    let share = (subscriber_minutes as f64 / total_minutes as f64 * 100.0).round();
    share.clamp(0.0, 100.0) as u32
}

/// Rounds half away from zero to `places` decimals.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
