//! Analytics aggregator.
//!
//! Runs the five report queries for a channel or a single video
//! concurrently and folds whatever succeeded into one
//! [`AnalyticsSnapshot`]. A report that answers non-2xx contributes nothing
//! and is recorded in the snapshot's report list. Only a network-level
//! failure fails the whole call.

pub mod aggregate;

use chrono::{NaiveDate, Utc};
use tubelens_core::{AnalyticsScope, AnalyticsSnapshot, ReportKind};

use crate::client::{error_detail, YoutubeClient};
use crate::error::YoutubeError;
use crate::types::ReportResponse;
use aggregate::{build_snapshot, ReportResult, ReportTable};

/// Earliest date the reporting API accepts.
pub const REPORT_START_DATE: &str = "2005-02-14";

/// One report request, before scope filters are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub kind: ReportKind,
    pub dimensions: Option<&'static str>,
    pub metrics: &'static str,
    pub sort: Option<&'static str>,
    pub max_results: Option<u32>,
    pub filters: Vec<String>,
}

impl ReportQuery {
    fn base(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Demographics => Self {
                kind,
                dimensions: Some("ageGroup,gender"),
                metrics: "viewerPercentage",
                sort: Some("-viewerPercentage"),
                max_results: None,
                filters: Vec::new(),
            },
            ReportKind::Geography => Self {
                kind,
                dimensions: Some("country"),
                metrics: "views,estimatedMinutesWatched",
                sort: Some("-views"),
                max_results: Some(10),
                filters: Vec::new(),
            },
            ReportKind::Devices => Self {
                kind,
                dimensions: Some("deviceType"),
                metrics: "viewerPercentage",
                sort: Some("-viewerPercentage"),
                max_results: None,
                filters: Vec::new(),
            },
            ReportKind::SubscriberWatchTime => Self {
                kind,
                dimensions: None,
                metrics: "estimatedMinutesWatched",
                sort: None,
                max_results: None,
                filters: vec!["subscribedStatus==SUBSCRIBED".to_string()],
            },
            ReportKind::TotalWatchTime => Self {
                kind,
                dimensions: None,
                metrics: "estimatedMinutesWatched",
                sort: None,
                max_results: None,
                filters: Vec::new(),
            },
        }
    }

    /// The query for `kind`, narrowed to `scope`.
    #[must_use]
    pub fn for_scope(kind: ReportKind, scope: &AnalyticsScope) -> Self {
        let mut query = Self::base(kind);
        if let AnalyticsScope::Video { video_id, .. } = scope {
            query.filters.push(format!("video=={video_id}"));
        }
        query
    }

    /// Query-string pairs for this report over `start..=end`.
    #[must_use]
    pub fn params(&self, channel_id: &str, start: &str, end: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("ids", format!("channel=={channel_id}")),
            ("startDate", start.to_string()),
            ("endDate", end.to_string()),
            ("metrics", self.metrics.to_string()),
        ];
        if let Some(dimensions) = self.dimensions {
            params.push(("dimensions", dimensions.to_string()));
        }
        if !self.filters.is_empty() {
            params.push(("filters", self.filters.join(";")));
        }
        if let Some(sort) = self.sort {
            params.push(("sort", sort.to_string()));
        }
        if let Some(max) = self.max_results {
            params.push(("maxResults", max.to_string()));
        }
        params
    }
}

fn scope_channel_id(scope: &AnalyticsScope) -> &str {
    match scope {
        AnalyticsScope::Channel { channel_id } | AnalyticsScope::Video { channel_id, .. } => {
            channel_id
        }
    }
}

/// Turns an `Unavailable` snapshot into [`YoutubeError::AnalyticsUnavailable`]
/// for callers that prefer an error to an empty snapshot.
///
/// # Errors
///
/// Returns [`YoutubeError::AnalyticsUnavailable`] when the reporting API
/// could not be used at all.
pub fn ensure_available(snapshot: AnalyticsSnapshot) -> Result<AnalyticsSnapshot, YoutubeError> {
    if snapshot.is_unavailable() {
        return Err(YoutubeError::AnalyticsUnavailable);
    }
    Ok(snapshot)
}

impl YoutubeClient {
    /// Channel-wide snapshot over the full reporting range up to today.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] on a network-level failure. Non-2xx
    /// reports degrade into empty contributions instead.
    pub async fn fetch_channel_analytics(
        &self,
        access_token: &str,
        channel_id: &str,
    ) -> Result<AnalyticsSnapshot, YoutubeError> {
        let scope = AnalyticsScope::Channel {
            channel_id: channel_id.to_string(),
        };
        self.fetch_analytics(access_token, scope, Utc::now().date_naive())
            .await
    }

    /// Snapshot for one video over the full reporting range up to today.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] on a network-level failure.
    pub async fn fetch_video_analytics(
        &self,
        access_token: &str,
        channel_id: &str,
        video_id: &str,
    ) -> Result<AnalyticsSnapshot, YoutubeError> {
        let scope = AnalyticsScope::Video {
            channel_id: channel_id.to_string(),
            video_id: video_id.to_string(),
        };
        self.fetch_analytics(access_token, scope, Utc::now().date_naive())
            .await
    }

    /// Runs all five reports for `scope` ending on `end_date` and aggregates
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if any report fails at the network level.
    pub async fn fetch_analytics(
        &self,
        access_token: &str,
        scope: AnalyticsScope,
        end_date: NaiveDate,
    ) -> Result<AnalyticsSnapshot, YoutubeError> {
        let end = end_date.format("%Y-%m-%d").to_string();
        let [demographics, geography, devices, subscriber, total] =
            ReportKind::ALL.map(|kind| ReportQuery::for_scope(kind, &scope));

        let (demographics, geography, devices, subscriber, total) = tokio::join!(
            self.run_report(access_token, &scope, &demographics, &end),
            self.run_report(access_token, &scope, &geography, &end),
            self.run_report(access_token, &scope, &devices, &end),
            self.run_report(access_token, &scope, &subscriber, &end),
            self.run_report(access_token, &scope, &total, &end),
        );
        let results = [demographics?, geography?, devices?, subscriber?, total?];

        let snapshot = build_snapshot(scope, &results);
        tracing::info!(
            scope = ?snapshot.scope,
            status = ?snapshot.status,
            total_watch_minutes = snapshot.total_watch_minutes,
            "aggregated analytics snapshot"
        );
        Ok(snapshot)
    }

    async fn run_report(
        &self,
        access_token: &str,
        scope: &AnalyticsScope,
        query: &ReportQuery,
        end: &str,
    ) -> Result<ReportResult, YoutubeError> {
        let params = query.params(scope_channel_id(scope), REPORT_START_DATE, end);
        let borrowed: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let url = self.analytics_url("reports", &borrowed);

        let response = self.send_authorized(&url, access_token).await?;
        let status = response.status();
        let http_status = status.as_u16();

        if !status.is_success() {
            let detail = error_detail(response).await;
            if http_status == 403 && query.kind == ReportKind::Demographics {
                tracing::warn!(%detail, "analytics report forbidden; the reporting API may be disabled for this project");
            } else {
                tracing::warn!(report = query.kind.as_str(), status = http_status, %detail, "analytics report failed");
            }
            return Ok(ReportResult {
                kind: query.kind,
                http_status,
                table: None,
            });
        }

        let body = response.text().await?;
        let table = match serde_json::from_str::<ReportResponse>(&body) {
            Ok(parsed) => ReportTable::from(parsed),
            Err(e) => {
                tracing::warn!(report = query.kind.as_str(), error = %e, "analytics report body did not parse");
                ReportTable::default()
            }
        };

        Ok(ReportResult {
            kind: query.kind,
            http_status,
            table: Some(table),
        })
    }
}
