//! PNG rendering of the notification distribution.
//!
//! Left panel is a histogram of average weekly notifications per location,
//! right panel a boxplot of the same values per bucket.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::analyzers::bucket::BUCKET_COUNT;
use crate::analyzers::types::LocationSummary;
use crate::analyzers::utility::histogram;

pub const DEFAULT_PLOT_PATH: &str = "notification_analysis.png";

const SIZE: (u32, u32) = (1200, 600);
const HISTOGRAM_BINS: usize = 20;

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Renders the histogram and per-bucket boxplot side by side into `path`.
///
/// The parent directory of `path` is created if it does not exist.
#[tracing::instrument(skip_all, fields(path = %path.display(), locations = summaries.len()))]
pub fn render_analysis(path: &Path, summaries: &[LocationSummary]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(SIZE.0 / 2);

    let values: Vec<f64> = summaries.iter().map(|s| s.notification_count).collect();
    draw_histogram(&left, &values)?;
    draw_boxplot(&right, summaries)?;

    root.present()?;
    info!("Plot saved");
    Ok(())
}

fn draw_histogram(area: &Panel<'_>, values: &[f64]) -> Result<()> {
    let (edges, counts) = histogram(values, HISTOGRAM_BINS);

    let x_range = match (edges.first(), edges.last()) {
        (Some(&lo), Some(&hi)) => lo..hi,
        _ => 0.0..1.0,
    };
    let y_max = counts.iter().copied().max().unwrap_or(0) as u32 + 1;

    let mut chart = ChartBuilder::on(area)
        .caption("Distribution of Weekly Notifications per Recipient", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, 0u32..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Average Weekly Notifications")
        .y_desc("Number of Recipients")
        .draw()?;

    let bars: Vec<_> = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| ([(edges[i], 0u32), (edges[i + 1], c as u32)], c))
        .collect();

    chart.draw_series(
        bars.iter()
            .map(|(rect, _)| Rectangle::new(*rect, BLUE.mix(0.6).filled())),
    )?;
    chart.draw_series(
        bars.iter()
            .filter(|(_, c)| *c > 0)
            .map(|(rect, _)| Rectangle::new(*rect, BLACK.stroke_width(1))),
    )?;

    Ok(())
}

fn draw_boxplot(area: &Panel<'_>, summaries: &[LocationSummary]) -> Result<()> {
    let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for s in summaries {
        groups
            .entry(s.bucket as u32)
            .or_default()
            .push(s.notification_count);
    }

    let lo = summaries
        .iter()
        .map(|s| s.notification_count)
        .fold(f64::INFINITY, f64::min);
    let hi = summaries
        .iter()
        .map(|s| s.notification_count)
        .fold(f64::NEG_INFINITY, f64::max);
    let y_range = if summaries.is_empty() {
        0f32..1f32
    } else {
        let pad = ((hi - lo) * 0.05).max(0.5);
        (lo - pad) as f32..(hi + pad) as f32
    };

    let mut chart = ChartBuilder::on(area)
        .caption("Notification Distribution by Bucket", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..(BUCKET_COUNT as u32 - 1)).into_segmented(), y_range)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Bucket (Quintile)")
        .y_desc("Weekly Notifications")
        .draw()?;

    chart.draw_series(groups.iter().map(|(&bucket, values)| {
        Boxplot::new_vertical(SegmentValue::CenterOf(bucket), &Quartiles::new(values.as_slice()))
            .width(30)
            .style(&BLUE)
    }))?;

    Ok(())
}
