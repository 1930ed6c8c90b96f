//! CLI entry point for the notification bucketing tool.
//!
//! Reads a notification recipient log, buckets locations into quintiles of
//! weekly notification volume, and writes the summary CSV and plot.

use anyhow::Result;
use clap::Parser;
use notification_buckets::analyzers::analyzer::{AnalysisConfig, analyze_notifications};
use notification_buckets::output::{
    DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH, print_json, print_report,
};
use notification_buckets::plot::DEFAULT_PLOT_PATH;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "notification_buckets")]
#[command(
    about = "Bucket notification recipients into quintiles of weekly volume",
    long_about = None
)]
struct Cli {
    /// CSV log with SentDate and LocationIds columns (.gz accepted)
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Summary CSV to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// PNG file for the histogram and boxplot
    #[arg(short, long, default_value = DEFAULT_PLOT_PATH)]
    plot: PathBuf,

    /// Skip rendering the plot
    #[arg(long, default_value_t = false)]
    no_plot: bool,

    /// Print the full report as JSON instead of the summary table
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/notification_buckets.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("notification_buckets.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = AnalysisConfig {
        input_path: cli.input,
        output_path: cli.output,
        plot_path: (!cli.no_plot).then_some(cli.plot),
    };

    let report = analyze_notifications(&config)?;

    if cli.json {
        print_json(&report)?;
    } else {
        print_report(&report, &config.output_path);
    }

    Ok(())
}
