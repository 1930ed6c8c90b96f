//! Data types produced by the aggregation pipeline.

use serde::{Deserialize, Serialize};

/// Number of notifications sent to one location within one ISO week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyCount {
    pub location_id: String,
    /// ISO week number, 1–53.
    pub week: u32,
    pub count: usize,
}

/// Per-location weekly notification volume and its quintile bucket.
///
/// Field names match the summary CSV header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    #[serde(rename = "LocationId")]
    pub location_id: String,
    /// Mean notifications per active week.
    #[serde(rename = "NotificationCount")]
    pub notification_count: f64,
    #[serde(rename = "WeeksWithNotifications")]
    pub weeks_with_notifications: usize,
    #[serde(rename = "Bucket")]
    pub bucket: usize,
}

/// Spread of `NotificationCount` within one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketStats {
    pub bucket: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: usize,
}

/// Everything a run of [`analyze_notifications`] hands back.
///
/// [`analyze_notifications`]: crate::analyzers::analyzer::analyze_notifications
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub raw_data: Vec<LocationSummary>,
    pub bucket_stats: Vec<BucketStats>,
    pub total_recipients: usize,
    pub recipients_per_bucket: usize,
}
