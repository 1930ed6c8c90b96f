use crate::analyzers::types::{LocationSummary, WeeklyCount};
use crate::analyzers::utility::mean;
use crate::parser::NotificationRecord;
use std::collections::BTreeMap;
use tracing::debug;

/// Explodes each record's location list and counts notifications per
/// (location, ISO week).
///
/// Output is ordered by location id, then week.
pub fn weekly_counts(records: &[NotificationRecord]) -> Vec<WeeklyCount> {
    let mut counts: BTreeMap<(&str, u32), usize> = BTreeMap::new();
    let mut dropped = 0usize;

    for record in records {
        let week = record.week();
        for location_id in record.locations() {
            *counts.entry((location_id, week)).or_default() += 1;
        }
        dropped += record.dropped_tokens();
    }

    debug!(groups = counts.len(), dropped_tokens = dropped, "Weekly counts grouped");

    counts
        .into_iter()
        .map(|((location_id, week), count)| WeeklyCount {
            location_id: location_id.to_string(),
            week,
            count,
        })
        .collect()
}

/// Collapses weekly counts into one [`LocationSummary`] per location: the
/// mean count over active weeks and the number of active weeks.
///
/// Buckets are left at 0; see [`assign_buckets`](crate::analyzers::bucket::assign_buckets).
pub fn summarize_locations(weekly: &[WeeklyCount]) -> Vec<LocationSummary> {
    let mut series: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for row in weekly {
        series
            .entry(row.location_id.as_str())
            .or_default()
            .push(row.count as f64);
    }

    series
        .into_iter()
        .map(|(location_id, counts)| LocationSummary {
            location_id: location_id.to_string(),
            notification_count: mean(&counts),
            weeks_with_notifications: counts.len(),
            bucket: 0,
        })
        .collect()
}
