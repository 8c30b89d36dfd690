//! Conversion of raw Data API resources into the canonical [`Channel`] and
//! [`Video`] records.

use tubelens_core::{Channel, Video};

use crate::types::{ChannelResource, Thumbnails, VideoResource};

/// Parses a count that arrives as a decimal string. Missing or malformed
/// values become `0`.
#[must_use]
pub fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Picks the largest available thumbnail, falling back to smaller sizes and
/// finally to an empty string.
#[must_use]
pub fn best_thumbnail(thumbnails: &Thumbnails) -> String {
    thumbnails
        .high
        .as_ref()
        .or(thumbnails.medium.as_ref())
        .or(thumbnails.default.as_ref())
        .map(|t| t.url.clone())
        .unwrap_or_default()
}

#[must_use]
pub fn normalize_channel(resource: &ChannelResource) -> Channel {
    let (name, custom_url, description, thumbnail_url, published_at) =
        match resource.snippet.as_ref() {
            Some(snippet) => (
                snippet.title.clone(),
                snippet.custom_url.clone().unwrap_or_default(),
                snippet.description.clone(),
                best_thumbnail(&snippet.thumbnails),
                snippet.published_at,
            ),
            None => Default::default(),
        };

    Channel {
        id: resource.id.clone(),
        name,
        custom_url,
        description,
        thumbnail_url,
        subscriber_count: parse_count(resource.statistics.subscriber_count.as_deref()),
        video_count: parse_count(resource.statistics.video_count.as_deref()),
        view_count: parse_count(resource.statistics.view_count.as_deref()),
        published_at,
    }
}

#[must_use]
pub fn normalize_video(resource: &VideoResource) -> Video {
    Video {
        id: resource.id.clone(),
        title: resource.snippet.title.clone(),
        description: resource.snippet.description.clone(),
        thumbnail_url: best_thumbnail(&resource.snippet.thumbnails),
        published_at: resource.snippet.published_at,
        view_count: parse_count(resource.statistics.view_count.as_deref()),
        like_count: parse_count(resource.statistics.like_count.as_deref()),
        comment_count: parse_count(resource.statistics.comment_count.as_deref()),
        duration: resource.content_details.duration.clone(),
        analytics: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChannelListResponse, VideoListResponse};

    #[test]
    fn parse_count_defaults_to_zero() {
        assert_eq!(parse_count(Some("1234")), 1234);
        assert_eq!(parse_count(Some("")), 0);
        assert_eq!(parse_count(Some("n/a")), 0);
        assert_eq!(parse_count(None), 0);
    }

    #[test]
    fn normalize_video_reads_statistics_strings() {
        let json = r#"{"items":[{
            "id": "abc",
            "snippet": {
                "title": "Launch day",
                "description": "We shipped",
                "publishedAt": "2024-05-01T10:00:00Z",
                "thumbnails": {
                    "default": {"url": "https://i.ytimg.com/default.jpg"},
                    "high": {"url": "https://i.ytimg.com/high.jpg"}
                }
            },
            "statistics": {"viewCount": "1500", "likeCount": "120"},
            "contentDetails": {"duration": "PT4M13S"}
        }]}"#;
        let response: VideoListResponse = serde_json::from_str(json).expect("parse");
        let video = normalize_video(&response.items[0]);

        assert_eq!(video.id, "abc");
        assert_eq!(video.thumbnail_url, "https://i.ytimg.com/high.jpg");
        assert_eq!(video.view_count, 1500);
        assert_eq!(video.like_count, 120);
        assert_eq!(video.comment_count, 0, "missing commentCount defaults to 0");
        assert_eq!(video.duration, "PT4M13S");
        assert!(video.analytics.is_none());
    }

    #[test]
    fn thumbnail_falls_back_to_smaller_sizes() {
        let json = r#"{"items":[{
            "id": "UC1",
            "snippet": {
                "title": "Creator",
                "customUrl": "@creator",
                "thumbnails": {"default": {"url": "https://yt3/default.jpg"}}
            },
            "statistics": {"subscriberCount": "10", "videoCount": "3", "viewCount": "999"}
        }]}"#;
        let response: ChannelListResponse = serde_json::from_str(json).expect("parse");
        let channel = normalize_channel(&response.items[0]);

        assert_eq!(channel.name, "Creator");
        assert_eq!(channel.custom_url, "@creator");
        assert_eq!(channel.thumbnail_url, "https://yt3/default.jpg");
        assert_eq!(channel.subscriber_count, 10);
        assert_eq!(channel.view_count, 999);
    }

    #[test]
    fn channel_without_snippet_has_empty_text_fields() {
        let response: ChannelListResponse =
            serde_json::from_str(r#"{"items":[{"id":"UC9"}]}"#).expect("parse");
        let channel = normalize_channel(&response.items[0]);
        assert_eq!(channel.id, "UC9");
        assert!(channel.name.is_empty());
        assert!(channel.thumbnail_url.is_empty());
        assert_eq!(channel.subscriber_count, 0);
    }
}
