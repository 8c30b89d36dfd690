//! Channel and video fetchers against a mocked Data API.

mod common;

use serde_json::json;
use tubelens_youtube::{FetchStage, YoutubeError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::test_client;

const TOKEN: &str = "ya29.valid";

fn video_item(id: &str, views: &str) -> serde_json::Value {
    json!({
        "id": id,
        "snippet": {
            "title": format!("Video {id}"),
            "description": "",
            "publishedAt": "2026-09-01T10:00:00Z",
            "thumbnails": {
                "medium": {"url": format!("https://i.ytimg.com/{id}/mq.jpg")}
            }
        },
        "statistics": {"viewCount": views, "likeCount": "3"},
        "contentDetails": {"duration": "PT2M5S"}
    })
}

fn search_body(ids: &[&str]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| json!({"id": {"kind": "youtube#video", "videoId": id}}))
        .collect();
    json!({ "items": items })
}

#[tokio::test]
async fn fetch_channel_returns_normalized_channel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/channels"))
        .and(query_param("part", "snippet,statistics"))
        .and(query_param("mine", "true"))
        .and(header("authorization", "Bearer ya29.valid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "UC1",
                "snippet": {
                    "title": "Creator",
                    "description": "Videos about things",
                    "customUrl": "@creator",
                    "publishedAt": "2015-06-01T00:00:00Z",
                    "thumbnails": {"high": {"url": "https://yt3/high.jpg"}}
                },
                "statistics": {"subscriberCount": "1200", "videoCount": "48", "viewCount": "250000"}
            }]
        })))
        .mount(&server)
        .await;

    let channel = test_client(&server)
        .fetch_channel(TOKEN)
        .await
        .expect("channel");

    assert_eq!(channel.id, "UC1");
    assert_eq!(channel.name, "Creator");
    assert_eq!(channel.custom_url, "@creator");
    assert_eq!(channel.thumbnail_url, "https://yt3/high.jpg");
    assert_eq!(channel.subscriber_count, 1200);
    assert_eq!(channel.video_count, 48);
    assert_eq!(channel.view_count, 250_000);
}

#[tokio::test]
async fn fetch_channel_without_items_is_no_channel_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_channel(TOKEN)
        .await
        .expect_err("no channel");

    assert!(matches!(err, YoutubeError::NoChannelFound), "got: {err:?}");
}

#[tokio::test]
async fn fetch_videos_runs_search_then_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("channelId", "UC1"))
        .and(query_param("order", "date"))
        .and(query_param("type", "video"))
        .and(query_param("maxResults", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["b", "a"])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .and(query_param("part", "snippet,statistics,contentDetails"))
        .and(query_param("id", "b,a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [video_item("a", "100"), video_item("b", "7")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let videos = test_client(&server)
        .fetch_videos(TOKEN, "UC1", 10)
        .await
        .expect("videos");

    let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"], "search order is kept");
    assert_eq!(videos[1].view_count, 100);
    assert_eq!(videos[1].like_count, 3);
    assert_eq!(videos[1].comment_count, 0);
    assert_eq!(videos[1].thumbnail_url, "https://i.ytimg.com/a/mq.jpg");
    assert_eq!(videos[1].duration, "PT2M5S");
}

#[tokio::test]
async fn empty_search_skips_detail_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(0)
        .mount(&server)
        .await;

    let videos = test_client(&server)
        .fetch_videos(TOKEN, "UC1", 10)
        .await
        .expect("videos");

    assert!(videos.is_empty());
}

#[tokio::test]
async fn oversized_limit_is_clamped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .fetch_videos(TOKEN, "UC1", 500)
        .await
        .expect("videos");
}

#[tokio::test]
async fn detail_failure_fails_whole_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["a"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_videos(TOKEN, "UC1", 10)
        .await
        .expect_err("should fail");

    match err {
        YoutubeError::UpstreamFetchFailed {
            stage,
            status,
            detail,
        } => {
            assert_eq!(stage, FetchStage::VideoDetails);
            assert_eq!(status, 500);
            assert_eq!(detail, "backend error");
        }
        other => panic!("expected UpstreamFetchFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn search_failure_reports_search_stage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "quotaExceeded"}
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_popular_videos(TOKEN, "UC1", 50)
        .await
        .expect_err("should fail");

    assert!(
        matches!(
            err,
            YoutubeError::UpstreamFetchFailed {
                stage: FetchStage::Search,
                status: 403,
                ..
            }
        ),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn popular_videos_are_sorted_by_views() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/search"))
        .and(query_param("order", "viewCount"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(&["x", "y", "z"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/youtube/v3/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [video_item("x", "5"), video_item("y", "50"), video_item("z", "10")]
        })))
        .mount(&server)
        .await;

    let videos = test_client(&server)
        .fetch_popular_videos(TOKEN, "UC1", 50)
        .await
        .expect("videos");

    let views: Vec<u64> = videos.iter().map(|v| v.view_count).collect();
    assert_eq!(views, vec![50, 10, 5]);
    assert!(videos.len() <= 10);
}
