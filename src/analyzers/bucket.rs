//! Equal-frequency bucketing of locations by weekly notification volume.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::analyzers::types::{BucketStats, LocationSummary};
use crate::analyzers::utility::{mean, quantile_sorted};

/// Locations are split into quintiles.
pub const BUCKET_COUNT: usize = 5;

/// Quantile cut points for `q` equal-frequency groups, with duplicate edges
/// collapsed.
///
/// | q | probabilities                  |
/// |---|--------------------------------|
/// | 5 | 0.0, 0.2, 0.4, 0.6, 0.8, 1.0   |
pub fn bin_edges(values: &[f64], q: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut edges: Vec<f64> = (0..=q)
        .filter_map(|i| quantile_sorted(&sorted, i as f64 / q as f64))
        .collect();
    edges.dedup();
    edges
}

/// Index of the right-closed interval `(edges[i], edges[i + 1]]` holding
/// `value`; the lowest interval also takes `edges[0]`.
pub fn bucket_of(value: f64, edges: &[f64]) -> usize {
    let intervals = edges.len().saturating_sub(1);
    if intervals == 0 {
        return 0;
    }

    edges[1..]
        .iter()
        .position(|&upper| value <= upper)
        .unwrap_or(intervals - 1)
}

/// Cuts `values` into `q` equal-frequency buckets, returning a bucket index
/// per value in input order.
///
/// When ties leave fewer distinct edges than `q + 1`, the bucket count
/// shrinks and indices stay contiguous from 0.
pub fn qcut(values: &[f64], q: usize) -> Vec<usize> {
    let edges = bin_edges(values, q);

    if !values.is_empty() && edges.len() < q + 1 {
        warn!(
            requested = q,
            available = edges.len().saturating_sub(1).max(1),
            "Too few distinct notification counts; buckets collapsed"
        );
    }

    values.iter().map(|&v| bucket_of(v, &edges)).collect()
}

/// Assigns every location its quintile bucket by `notification_count`.
pub fn assign_buckets(summaries: &mut [LocationSummary]) {
    let values: Vec<f64> = summaries.iter().map(|s| s.notification_count).collect();

    for (summary, bucket) in summaries.iter_mut().zip(qcut(&values, BUCKET_COUNT)) {
        summary.bucket = bucket;
    }

    debug!(locations = summaries.len(), "Buckets assigned");
}

/// Min/max/mean/count of `notification_count` for every non-empty bucket,
/// ordered by bucket index.
pub fn bucket_stats(summaries: &[LocationSummary]) -> Vec<BucketStats> {
    let mut groups: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for s in summaries {
        groups.entry(s.bucket).or_default().push(s.notification_count);
    }

    groups
        .into_iter()
        .map(|(bucket, values)| BucketStats {
            bucket,
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean: mean(&values),
            count: values.len(),
        })
        .collect()
}
