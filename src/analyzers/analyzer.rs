use crate::analyzers::aggregate::{summarize_locations, weekly_counts};
use crate::analyzers::bucket::{BUCKET_COUNT, assign_buckets, bucket_stats};
use crate::analyzers::types::AnalysisReport;
use crate::output::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, write_summary};
use crate::parser::{NotificationRecord, read_notifications};
use crate::plot::{DEFAULT_PLOT_PATH, render_analysis};
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where a run reads from and writes to.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// `None` skips rendering the plot.
    pub plot_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            plot_path: Some(PathBuf::from(DEFAULT_PLOT_PATH)),
        }
    }
}

/// Runs the whole pipeline: read the log, count notifications per location
/// and ISO week, average per location, bucket into quintiles, render the
/// plot, and write the summary CSV.
#[tracing::instrument(skip_all, fields(input = %config.input_path.display()))]
pub fn analyze_notifications(config: &AnalysisConfig) -> Result<AnalysisReport> {
    let records = read_notifications(&config.input_path)?;
    info!(rows = records.len(), "Notification log loaded");

    let report = build_report(&records);

    if let Some(plot_path) = &config.plot_path {
        render_analysis(plot_path, &report.raw_data)?;
    }

    write_summary(&config.output_path, &report.raw_data)?;
    info!(
        output = %config.output_path.display(),
        total_recipients = report.total_recipients,
        "Analysis complete"
    );

    Ok(report)
}

/// The in-memory part of the pipeline, from parsed records to the report.
pub fn build_report(records: &[NotificationRecord]) -> AnalysisReport {
    let weekly = weekly_counts(records);
    debug!(weekly_rows = weekly.len(), "Weekly counts computed");

    let mut summaries = summarize_locations(&weekly);
    assign_buckets(&mut summaries);
    let stats = bucket_stats(&summaries);

    let total_recipients = summaries.len();
    AnalysisReport {
        raw_data: summaries,
        bucket_stats: stats,
        total_recipients,
        recipients_per_bucket: total_recipients / BUCKET_COUNT,
    }
}
