use notification_buckets::analyzers::aggregate::weekly_counts;
use notification_buckets::analyzers::analyzer::{AnalysisConfig, analyze_notifications};
use notification_buckets::error::InputError;
use notification_buckets::output::{read_summary, write_summary};
use notification_buckets::parser::read_notifications;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/notifications.csv")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("notification_buckets_it_{name}"));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_full_pipeline() {
    let dir = scratch_dir("full_pipeline");
    let config = AnalysisConfig {
        input_path: fixture(),
        output_path: dir.join("data").join("notification_output.csv"),
        plot_path: None,
    };

    let report = analyze_notifications(&config).expect("pipeline failed");

    assert_eq!(report.total_recipients, 10);
    assert_eq!(report.recipients_per_bucket, 2);
    assert_eq!(report.bucket_stats.len(), 5);

    for summary in &report.raw_data {
        let k: f64 = summary.location_id.parse().unwrap();
        assert_eq!(summary.notification_count, k);
        assert_eq!(summary.weeks_with_notifications, 2);
        assert_eq!(summary.bucket, ((k as usize) - 1) / 2);
    }

    for (i, stats) in report.bucket_stats.iter().enumerate() {
        assert_eq!(stats.bucket, i);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, (2 * i + 1) as f64);
        assert_eq!(stats.max, (2 * i + 2) as f64);
    }

    assert!(config.output_path.exists());
    let reloaded = read_summary(&config.output_path).unwrap();
    assert_eq!(reloaded, report.raw_data);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_weekly_totals_match_exploded_events() {
    let records = read_notifications(&fixture()).unwrap();
    // The row with a blank SentDate is skipped.
    assert_eq!(records.len(), 20);

    let mut totals: HashMap<String, usize> = HashMap::new();
    for w in weekly_counts(&records) {
        *totals.entry(w.location_id).or_default() += w.count;
    }

    assert_eq!(totals.len(), 10);
    for (id, total) in totals {
        let k: usize = id.parse().unwrap();
        assert_eq!(total, 2 * k, "location {id}");
    }
}

#[test]
fn test_output_round_trip_keeps_buckets() {
    let dir = scratch_dir("round_trip");
    let config = AnalysisConfig {
        input_path: fixture(),
        output_path: dir.join("first.csv"),
        plot_path: None,
    };
    let report = analyze_notifications(&config).unwrap();

    let first = read_summary(&config.output_path).unwrap();
    let second_path = dir.join("second.csv");
    write_summary(&second_path, &first).unwrap();
    let second = read_summary(&second_path).unwrap();

    let buckets = |rows: &[notification_buckets::analyzers::types::LocationSummary]| {
        rows.iter()
            .map(|r| (r.location_id.clone(), r.bucket))
            .collect::<Vec<_>>()
    };
    assert_eq!(buckets(&second), buckets(&report.raw_data));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_buckets_non_decreasing_in_count() {
    let dir = scratch_dir("monotonic");
    let input = dir.join("input.csv");
    fs::create_dir_all(&dir).unwrap();

    let mut csv = String::from("SentDate,LocationIds\n");
    let weekly_volume = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 8, 9, 7];
    for (i, &n) in weekly_volume.iter().enumerate() {
        for _ in 0..n {
            csv.push_str(&format!("2024-05-07,site-{i}\n"));
        }
    }
    fs::write(&input, csv).unwrap();

    let config = AnalysisConfig {
        input_path: input,
        output_path: dir.join("out.csv"),
        plot_path: None,
    };
    let report = analyze_notifications(&config).unwrap();

    let mut rows = report.raw_data.clone();
    rows.sort_by(|a, b| a.notification_count.total_cmp(&b.notification_count));
    assert!(rows.windows(2).all(|w| w[0].bucket <= w[1].bucket));
    assert_eq!(rows.first().map(|r| r.bucket), Some(0));
    assert_eq!(rows.last().map(|r| r.bucket), Some(4));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_column_fails_run() {
    let dir = scratch_dir("missing_column");
    let input = dir.join("input.csv");
    fs::create_dir_all(&dir).unwrap();
    fs::write(&input, "LocationIds,Channel\n1,email\n").unwrap();

    let config = AnalysisConfig {
        input_path: input,
        output_path: dir.join("out.csv"),
        plot_path: None,
    };
    let err = analyze_notifications(&config).unwrap_err();

    assert_eq!(
        err.downcast_ref::<InputError>(),
        Some(&InputError::MissingColumn("SentDate"))
    );
    assert!(!config.output_path.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_malformed_date_fails_run() {
    let dir = scratch_dir("malformed_date");
    let input = dir.join("input.csv");
    fs::create_dir_all(&dir).unwrap();
    fs::write(&input, "SentDate,LocationIds\n2024-01-01,1\n31.02.2024,2\n").unwrap();

    let config = AnalysisConfig {
        input_path: input,
        output_path: dir.join("out.csv"),
        plot_path: None,
    };
    let err = analyze_notifications(&config).unwrap_err();

    match err.downcast_ref::<InputError>() {
        Some(InputError::MalformedDate { line, value }) => {
            assert_eq!(*line, 3);
            assert_eq!(value, "31.02.2024");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_pipeline_renders_plot() {
    let dir = scratch_dir("plot");
    let config = AnalysisConfig {
        input_path: fixture(),
        output_path: dir.join("out.csv"),
        plot_path: Some(dir.join("images").join("notification_analysis.png")),
    };

    analyze_notifications(&config).unwrap();

    let plot = config.plot_path.as_ref().unwrap();
    assert!(fs::metadata(plot).unwrap().len() > 0);
    assert!(config.output_path.exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_same_iso_week_across_years_counts_as_one_week() {
    let dir = scratch_dir("cross_year");
    let input = dir.join("input.csv");
    fs::create_dir_all(&dir).unwrap();
    fs::write(&input, "SentDate,LocationIds\n2023-01-04,x\n2024-01-03,x\n").unwrap();

    let config = AnalysisConfig {
        input_path: input,
        output_path: dir.join("out.csv"),
        plot_path: None,
    };
    let report = analyze_notifications(&config).unwrap();

    assert_eq!(report.raw_data.len(), 1);
    assert_eq!(report.raw_data[0].notification_count, 2.0);
    assert_eq!(report.raw_data[0].weeks_with_notifications, 1);

    fs::remove_dir_all(&dir).unwrap();
}
