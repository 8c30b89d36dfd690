//! Pure aggregation of raw report rows into an [`AnalyticsSnapshot`].
//!
//! Nothing here performs I/O. Report tables are read by column name, with a
//! positional fallback when headers are missing.

use serde_json::Value;
use tubelens_core::labels::{age_group_label, country_name, device_label, AgeGroup, Gender};
use tubelens_core::metrics::round_to;
use tubelens_core::{
    AgeBucket, AgeGenderRow, AnalyticsScope, AnalyticsSnapshot, CountryShare, Demographics,
    DeviceShare, GenderBucket, ReportKind, ReportStatus, SnapshotStatus,
};

use crate::types::ReportResponse;

/// A decoded report body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl From<ReportResponse> for ReportTable {
    fn from(response: ReportResponse) -> Self {
        Self {
            columns: response
                .column_headers
                .into_iter()
                .map(|h| h.name)
                .collect(),
            rows: response.rows.unwrap_or_default(),
        }
    }
}

impl ReportTable {
    #[must_use]
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows,
        }
    }

    fn column(&self, name: &str, fallback: usize) -> usize {
        self.columns
            .iter()
            .position(|c| c == name)
            .unwrap_or(fallback)
    }
}

/// Outcome of one report request: the HTTP status, plus the table when the
/// request succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResult {
    pub kind: ReportKind,
    pub http_status: u16,
    pub table: Option<ReportTable>,
}

impl ReportResult {
    fn table(&self) -> Option<&ReportTable> {
        self.table.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DemographicRow {
    pub age_group: String,
    pub gender: String,
    pub viewer_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryRow {
    pub country: String,
    pub views: u64,
    pub minutes_watched: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub device_type: String,
    pub viewer_percentage: f64,
}

fn cell_str(row: &[Value], idx: usize) -> Option<&str> {
    row.get(idx).and_then(Value::as_str)
}

fn cell_f64(row: &[Value], idx: usize) -> Option<f64> {
    let value = match row.get(idx)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_u64(row: &[Value], idx: usize) -> Option<u64> {
    cell_f64(row, idx).map(|v| v.max(0.0).round() as u64)
}

fn clamp_percent(value: f64, places: i32) -> f64 {
    round_to(value, places).clamp(0.0, 100.0)
}

#[must_use]
pub fn demographic_rows(table: &ReportTable) -> Vec<DemographicRow> {
    let age = table.column("ageGroup", 0);
    let gender = table.column("gender", 1);
    let pct = table.column("viewerPercentage", 2);
    table
        .rows
        .iter()
        .filter_map(|row| {
            Some(DemographicRow {
                age_group: cell_str(row, age)?.to_string(),
                gender: cell_str(row, gender)?.to_string(),
                viewer_percentage: cell_f64(row, pct)?,
            })
        })
        .collect()
}

#[must_use]
pub fn country_rows(table: &ReportTable) -> Vec<CountryRow> {
    let country = table.column("country", 0);
    let views = table.column("views", 1);
    let minutes = table.column("estimatedMinutesWatched", 2);
    table
        .rows
        .iter()
        .filter_map(|row| {
            Some(CountryRow {
                country: cell_str(row, country)?.to_string(),
                views: cell_u64(row, views).unwrap_or(0),
                minutes_watched: cell_u64(row, minutes).unwrap_or(0),
            })
        })
        .collect()
}

#[must_use]
pub fn device_rows(table: &ReportTable) -> Vec<DeviceRow> {
    let device = table.column("deviceType", 0);
    let pct = table.column("viewerPercentage", 1);
    table
        .rows
        .iter()
        .filter_map(|row| {
            Some(DeviceRow {
                device_type: cell_str(row, device)?.to_string(),
                viewer_percentage: cell_f64(row, pct)?,
            })
        })
        .collect()
}

/// First cell of the first row, or `0` when the report is empty.
#[must_use]
pub fn first_scalar(table: &ReportTable) -> u64 {
    table
        .rows
        .first()
        .and_then(|row| cell_u64(row, 0))
        .unwrap_or(0)
}

/// Sums values per key, keeping first-seen key order.
fn accumulate<'a>(entries: impl Iterator<Item = (&'a str, f64)>) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for (key, value) in entries {
        match totals.iter_mut().find(|(k, _)| k == key) {
            Some((_, total)) => *total += value,
            None => totals.push((key.to_string(), value)),
        }
    }
    totals
}

fn sorted_desc<T>(mut items: Vec<T>, pct: impl Fn(&T) -> f64) -> Vec<T> {
    items.sort_by(|a, b| pct(b).total_cmp(&pct(a)));
    items
}

#[must_use]
pub fn age_buckets(rows: &[DemographicRow]) -> Vec<AgeBucket> {
    let totals = accumulate(
        rows.iter()
            .map(|r| (age_group_label(&r.age_group), r.viewer_percentage)),
    );
    let buckets = totals
        .into_iter()
        .map(|(age_group, total)| AgeBucket {
            age_group,
            percentage: clamp_percent(total, 2),
        })
        .collect();
    sorted_desc(buckets, |b: &AgeBucket| b.percentage)
}

#[must_use]
pub fn gender_buckets(rows: &[DemographicRow]) -> Vec<GenderBucket> {
    let totals = accumulate(
        rows.iter()
            .map(|r| (Gender::from_api(&r.gender).label(), r.viewer_percentage)),
    );
    let buckets = totals
        .into_iter()
        .map(|(gender, total)| GenderBucket {
            gender,
            percentage: clamp_percent(total, 2),
        })
        .collect();
    sorted_desc(buckets, |b: &GenderBucket| b.percentage)
}

/// Male/female split per age group, in canonical age order. Age groups with
/// no rows are left out.
#[must_use]
pub fn age_gender_table(rows: &[DemographicRow]) -> Vec<AgeGenderRow> {
    let mut sums: [Option<(f64, f64)>; 7] = [None; 7];
    for row in rows {
        let Some(group) = AgeGroup::from_api(&row.age_group) else {
            continue;
        };
        let Some(slot) = AgeGroup::ORDER.iter().position(|g| *g == group) else {
            continue;
        };
        let (male, female) = sums[slot].get_or_insert((0.0, 0.0));
        match Gender::from_api(&row.gender) {
            Gender::Male => *male += row.viewer_percentage,
            Gender::Female => *female += row.viewer_percentage,
            Gender::Other => {}
        }
    }

    AgeGroup::ORDER
        .iter()
        .zip(sums)
        .filter_map(|(group, sum)| {
            let (male, female) = sum?;
            Some(AgeGenderRow {
                age_group: group.label().to_string(),
                male: clamp_percent(male, 1),
                female: clamp_percent(female, 1),
                total: clamp_percent(male + female, 1),
            })
        })
        .collect()
}

/// Per-country view share, recomputed from view counts so the percentages
/// cover only the returned countries.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn geography(rows: &[CountryRow]) -> Vec<CountryShare> {
    let total_views: u64 = rows.iter().map(|r| r.views).sum();
    rows.iter()
        .map(|row| {
            let percentage = if total_views == 0 {
                0.0
            } else {
                clamp_percent(row.views as f64 / total_views as f64 * 100.0, 2)
            };
            CountryShare {
                country: country_name(&row.country).to_string(),
                percentage,
                views: row.views,
                minutes_watched: row.minutes_watched,
            }
        })
        .collect()
}

#[must_use]
pub fn device_shares(rows: &[DeviceRow]) -> Vec<DeviceShare> {
    let totals = accumulate(
        rows.iter()
            .map(|r| (device_label(&r.device_type), r.viewer_percentage)),
    );
    let shares = totals
        .into_iter()
        .map(|(device_type, total)| DeviceShare {
            device_type,
            percentage: clamp_percent(total, 2),
        })
        .collect();
    sorted_desc(shares, |d: &DeviceShare| d.percentage)
}

/// Combines the five report outcomes into one snapshot. Failed reports
/// contribute nothing.
#[must_use]
pub fn build_snapshot(scope: AnalyticsScope, results: &[ReportResult]) -> AnalyticsSnapshot {
    let table_for = |kind: ReportKind| {
        results
            .iter()
            .find(|r| r.kind == kind)
            .and_then(ReportResult::table)
    };

    let demographic = table_for(ReportKind::Demographics)
        .map(demographic_rows)
        .unwrap_or_default();
    let demographics = Demographics {
        age_buckets: age_buckets(&demographic),
        gender_buckets: gender_buckets(&demographic),
        age_gender_table: age_gender_table(&demographic),
    };
    let geography = table_for(ReportKind::Geography)
        .map(|t| geography(&country_rows(t)))
        .unwrap_or_default();
    let device_types = table_for(ReportKind::Devices)
        .map(|t| device_shares(&device_rows(t)))
        .unwrap_or_default();
    let subscriber_watch_minutes = table_for(ReportKind::SubscriberWatchTime)
        .map_or(0, first_scalar);
    let total_watch_minutes = table_for(ReportKind::TotalWatchTime).map_or(0, first_scalar);

    let reports: Vec<ReportStatus> = results
        .iter()
        .map(|r| ReportStatus {
            report: r.kind,
            http_status: r.http_status,
        })
        .collect();

    let mut snapshot = AnalyticsSnapshot {
        scope,
        demographics,
        geography,
        device_types,
        total_watch_minutes,
        subscriber_watch_minutes,
        reports,
        status: SnapshotStatus::Complete,
    };
    snapshot.status = SnapshotStatus::from_reports(&snapshot.reports, snapshot.has_data());
    snapshot
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
