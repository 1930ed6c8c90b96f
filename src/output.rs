//! Output formatting and persistence for location summaries.
//!
//! Supports the summary CSV (write and reload), a plain-text console report,
//! and JSON.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;
use tracing::debug;

use crate::analyzers::types::{AnalysisReport, LocationSummary};

pub const DEFAULT_INPUT_PATH: &str = "data/NotificationRecipient.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/notification_output.csv";

/// Writes one row per location to `path`, replacing any existing file.
///
/// Creates the parent directory if it does not exist.
pub fn write_summary(path: &Path, summaries: &[LocationSummary]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    debug!(path = %path.display(), rows = summaries.len(), "Writing summary CSV");

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    if summaries.is_empty() {
        writer.write_record([
            "LocationId",
            "NotificationCount",
            "WeeksWithNotifications",
            "Bucket",
        ])?;
    }
    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;

    Ok(())
}

/// Reloads a summary CSV previously produced by [`write_summary`].
pub fn read_summary(path: &Path) -> Result<Vec<LocationSummary>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: LocationSummary = result?;
        rows.push(row);
    }

    Ok(rows)
}

/// Formats the console report shown at the end of a run.
pub fn format_report(report: &AnalysisReport, output_path: &Path) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Analysis complete. Results saved to {}", output_path.display());
    let _ = writeln!(out, "Bucket statistics:");
    let _ = writeln!(
        out,
        "{:>6} {:>10} {:>10} {:>10} {:>6}",
        "Bucket", "min", "max", "mean", "count"
    );
    for s in &report.bucket_stats {
        let _ = writeln!(
            out,
            "{:>6} {:>10.4} {:>10.4} {:>10.4} {:>6}",
            s.bucket, s.min, s.max, s.mean, s.count
        );
    }
    let _ = writeln!(out, "Total recipients: {}", report.total_recipients);
    let _ = writeln!(out, "Recipients per bucket: {}", report.recipients_per_bucket);

    out
}

/// Prints the console report to stdout.
pub fn print_report(report: &AnalysisReport, output_path: &Path) {
    print!("{}", format_report(report, output_path));
}

/// Prints the full report as pretty-printed JSON to stdout.
pub fn print_json(report: &AnalysisReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
