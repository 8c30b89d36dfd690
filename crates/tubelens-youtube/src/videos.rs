//! Channel and video fetchers.
//!
//! Video lists are built in two stages: a search for ids, then one detail
//! call for snippet, statistics, and duration. A failure in either stage
//! fails the whole fetch.

use tubelens_core::{Channel, Video};

use crate::client::YoutubeClient;
use crate::error::{FetchStage, YoutubeError};
use crate::normalize::{normalize_channel, normalize_video};
use crate::types::{ChannelListResponse, SearchListResponse, VideoListResponse};

/// Largest page the search endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Popular-video lists are cut to this many entries after sorting.
pub const POPULAR_VIDEO_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy)]
enum SearchOrder {
    Date,
    ViewCount,
}

impl SearchOrder {
    fn as_str(self) -> &'static str {
        match self {
            SearchOrder::Date => "date",
            SearchOrder::ViewCount => "viewCount",
        }
    }
}

fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_PAGE_SIZE)
}

/// Sorts by view count, highest first, keeping search order among ties,
/// then truncates to [`POPULAR_VIDEO_LIMIT`].
#[must_use]
pub fn rank_popular(mut videos: Vec<Video>) -> Vec<Video> {
    videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    videos.truncate(POPULAR_VIDEO_LIMIT);
    videos
}

impl YoutubeClient {
    /// Fetches the channel owned by the account behind `access_token`.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::UpstreamFetchFailed`] on a non-2xx response.
    /// - [`YoutubeError::NoChannelFound`] if the account has no channel.
    pub async fn fetch_channel(&self, access_token: &str) -> Result<Channel, YoutubeError> {
        let url = self.data_url(
            "channels",
            &[("part", "snippet,statistics"), ("mine", "true")],
        );
        let response: ChannelListResponse = self
            .get_json(&url, access_token, FetchStage::ChannelLookup)
            .await?;

        response
            .items
            .first()
            .map(normalize_channel)
            .ok_or(YoutubeError::NoChannelFound)
    }

    /// Fetches the channel's most recent videos, newest first.
    ///
    /// `limit` is clamped to `1..=50`.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::UpstreamFetchFailed`] if either the search or
    /// the detail call answers non-2xx.
    pub async fn fetch_videos(
        &self,
        access_token: &str,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<Video>, YoutubeError> {
        self.search_and_fetch(access_token, channel_id, SearchOrder::Date, limit)
            .await
    }

    /// Fetches the channel's most viewed videos, at most
    /// [`POPULAR_VIDEO_LIMIT`], highest view count first.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::UpstreamFetchFailed`] if either the search or
    /// the detail call answers non-2xx.
    pub async fn fetch_popular_videos(
        &self,
        access_token: &str,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<Video>, YoutubeError> {
        let videos = self
            .search_and_fetch(access_token, channel_id, SearchOrder::ViewCount, limit)
            .await?;
        Ok(rank_popular(videos))
    }

    async fn search_and_fetch(
        &self,
        access_token: &str,
        channel_id: &str,
        order: SearchOrder,
        limit: u32,
    ) -> Result<Vec<Video>, YoutubeError> {
        let max_results = clamp_limit(limit).to_string();
        let search_url = self.data_url(
            "search",
            &[
                ("part", "snippet"),
                ("channelId", channel_id),
                ("order", order.as_str()),
                ("type", "video"),
                ("maxResults", &max_results),
            ],
        );
        let search: SearchListResponse = self
            .get_json(&search_url, access_token, FetchStage::Search)
            .await?;

        let ids: Vec<String> = search
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        if ids.is_empty() {
            tracing::debug!(channel_id, ?order, "search returned no videos");
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let details_url = self.data_url(
            "videos",
            &[("part", "snippet,statistics,contentDetails"), ("id", &joined)],
        );
        let details: VideoListResponse = self
            .get_json(&details_url, access_token, FetchStage::VideoDetails)
            .await?;

        // The detail call does not promise to echo the requested order.
        let mut videos: Vec<Video> = details.items.iter().map(normalize_video).collect();
        videos.sort_by_key(|v| ids.iter().position(|id| *id == v.id).unwrap_or(usize::MAX));

        tracing::debug!(channel_id, ?order, count = videos.len(), "fetched videos");
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, views: u64) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {id}"),
            description: String::new(),
            thumbnail_url: String::new(),
            published_at: None,
            view_count: views,
            like_count: 0,
            comment_count: 0,
            duration: "PT1M".to_string(),
            analytics: None,
        }
    }

    #[test]
    fn rank_popular_sorts_descending() {
        let ranked = rank_popular(vec![video("a", 5), video("b", 50), video("c", 10)]);
        let views: Vec<u64> = ranked.iter().map(|v| v.view_count).collect();
        assert_eq!(views, vec![50, 10, 5]);
    }

    #[test]
    fn rank_popular_keeps_order_among_ties() {
        let ranked = rank_popular(vec![video("first", 7), video("second", 7), video("top", 9)]);
        let ids: Vec<&str> = ranked.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "first", "second"]);
    }

    #[test]
    fn rank_popular_truncates_to_ten() {
        let videos = (0..25).map(|i| video(&format!("v{i}"), i)).collect();
        let ranked = rank_popular(videos);
        assert_eq!(ranked.len(), POPULAR_VIDEO_LIMIT);
        assert_eq!(ranked[0].view_count, 24);
    }

    #[test]
    fn limit_is_clamped_to_page_range() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(10), 10);
        assert_eq!(clamp_limit(500), MAX_PAGE_SIZE);
    }
}
