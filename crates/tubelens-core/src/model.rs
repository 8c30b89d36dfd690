//! Canonical channel, video, and analytics records.
//!
//! Every value here is built fresh by a fetch or aggregation call and handed
//! to consumers as plain immutable data. Nothing in the workspace mutates a
//! record after construction; a newer fetch replaces it wholesale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the authorized account's channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    /// Handle such as `@creator`; empty when the channel has none.
    pub custom_url: String,
    pub description: String,
    pub thumbnail_url: String,
    pub subscriber_count: u64,
    pub video_count: u64,
    pub view_count: u64,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// ISO-8601 duration as returned upstream, e.g. `PT4M13S`.
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<AnalyticsSnapshot>,
}

/// What an [`AnalyticsSnapshot`] was computed over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsScope {
    Channel { channel_id: String },
    Video { channel_id: String, video_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBucket {
    pub age_group: String,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderBucket {
    pub gender: String,
    pub percentage: f64,
}

/// One row of the combined age × gender table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeGenderRow {
    pub age_group: String,
    pub male: f64,
    pub female: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub age_buckets: Vec<AgeBucket>,
    pub gender_buckets: Vec<GenderBucket>,
    pub age_gender_table: Vec<AgeGenderRow>,
}

impl Demographics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.age_buckets.is_empty()
            && self.gender_buckets.is_empty()
            && self.age_gender_table.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryShare {
    /// Display name, or the raw code when the code is not in the lookup table.
    pub country: String,
    pub percentage: f64,
    pub views: u64,
    pub minutes_watched: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceShare {
    pub device_type: String,
    pub percentage: f64,
}

/// The five report queries that feed a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Demographics,
    Geography,
    Devices,
    SubscriberWatchTime,
    TotalWatchTime,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Demographics,
        ReportKind::Geography,
        ReportKind::Devices,
        ReportKind::SubscriberWatchTime,
        ReportKind::TotalWatchTime,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::Demographics => "demographics",
            ReportKind::Geography => "geography",
            ReportKind::Devices => "devices",
            ReportKind::SubscriberWatchTime => "subscriber_watch_time",
            ReportKind::TotalWatchTime => "total_watch_time",
        }
    }
}

/// HTTP outcome of one report query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatus {
    pub report: ReportKind,
    pub http_status: u16,
}

impl ReportStatus {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        (200..300).contains(&self.http_status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    /// Every report answered 2xx.
    Complete,
    /// Some reports failed and contributed nothing.
    Partial,
    /// The reporting API is not usable for this project (typically disabled),
    /// as opposed to a channel that genuinely has no activity.
    Unavailable,
}

impl SnapshotStatus {
    /// Derives the status from per-report outcomes.
    ///
    /// A failed demographics report together with an empty snapshot means the
    /// reporting API itself is off; that is the only path to `Unavailable`.
    #[must_use]
    pub fn from_reports(reports: &[ReportStatus], has_data: bool) -> Self {
        let demographics_failed = reports
            .iter()
            .any(|r| r.report == ReportKind::Demographics && !r.succeeded());
        if demographics_failed && !has_data {
            return SnapshotStatus::Unavailable;
        }
        if reports.iter().all(ReportStatus::succeeded) {
            SnapshotStatus::Complete
        } else {
            SnapshotStatus::Partial
        }
    }
}

/// Audience and watch-time aggregates for a channel or a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub scope: AnalyticsScope,
    pub demographics: Demographics,
    pub geography: Vec<CountryShare>,
    pub device_types: Vec<DeviceShare>,
    pub total_watch_minutes: u64,
    pub subscriber_watch_minutes: u64,
    pub reports: Vec<ReportStatus>,
    pub status: SnapshotStatus,
}

impl AnalyticsSnapshot {
    /// `true` when any collection is non-empty or either watch-time scalar is non-zero.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.demographics.is_empty()
            || !self.geography.is_empty()
            || !self.device_types.is_empty()
            || self.total_watch_minutes > 0
            || self.subscriber_watch_minutes > 0
    }

    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.status == SnapshotStatus::Unavailable
    }

    /// Share of total watch time that came from subscribers, as a whole percentage.
    #[must_use]
    pub fn subscriber_watch_share(&self) -> u32 {
        crate::metrics::subscriber_watch_share(
            self.subscriber_watch_minutes,
            self.total_watch_minutes,
        )
    }
}
