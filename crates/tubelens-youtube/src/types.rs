//! Raw response shapes for the token endpoint, the Data API, and the
//! Analytics reports API. Only the fields the fetchers read are modelled.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Successful response from the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    /// Present on authorization-code grants with `access_type=offline`.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<ChannelResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelResource {
    pub id: String,
    /// Absent when only `part=id` was requested.
    #[serde(default)]
    pub snippet: Option<Snippet>,
    #[serde(default)]
    pub statistics: ChannelStatistics,
}

/// Counts arrive as decimal strings and may be missing entirely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default)]
    pub subscriber_count: Option<String>,
    #[serde(default)]
    pub video_count: Option<String>,
    #[serde(default)]
    pub view_count: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
}

/// `videoId` is only set for `type=video` results.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoResource>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResource {
    pub id: String,
    pub snippet: Snippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
    #[serde(default)]
    pub content_details: ContentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentDetails {
    /// ISO-8601 duration such as `PT4M13S`.
    #[serde(default)]
    pub duration: String,
}

/// Tabular response from the Analytics `reports` endpoint.
///
/// `rows` is omitted entirely when the query matched nothing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[serde(default)]
    pub column_headers: Vec<ColumnHeader>,
    #[serde(default)]
    pub rows: Option<Vec<Vec<serde_json::Value>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnHeader {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_resource_tolerates_missing_statistics() {
        let json = r#"{
            "id": "vid1",
            "snippet": {"title": "Hello", "publishedAt": "2024-03-01T12:00:00Z"}
        }"#;
        let video: VideoResource = serde_json::from_str(json).expect("parse");
        assert_eq!(video.id, "vid1");
        assert!(video.statistics.view_count.is_none());
        assert!(video.content_details.duration.is_empty());
        assert!(video.snippet.published_at.is_some());
    }

    #[test]
    fn report_without_rows_parses_as_none() {
        let json = r#"{"kind":"youtubeAnalytics#resultTable","columnHeaders":[{"name":"views","columnType":"METRIC","dataType":"INTEGER"}]}"#;
        let report: ReportResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(report.column_headers.len(), 1);
        assert!(report.rows.is_none());
    }

    #[test]
    fn token_grant_without_refresh_token() {
        let json = r#"{"access_token":"ya29.a","expires_in":3599,"token_type":"Bearer"}"#;
        let grant: TokenGrant = serde_json::from_str(json).expect("parse");
        assert_eq!(grant.expires_in, 3599);
        assert!(grant.refresh_token.is_none());
    }
}
