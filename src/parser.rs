//! CSV parser for notification recipient logs.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::error::InputError;

pub const SENT_DATE: &str = "SentDate";
pub const LOCATION_IDS: &str = "LocationIds";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// One send event from the input log.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    pub sent_date: NaiveDateTime,
    /// Raw comma-separated identifiers, as they appear in the file.
    pub location_ids: String,
}

impl NotificationRecord {
    /// ISO-8601 week number (1–53) of `sent_date`. The ISO year is not
    /// part of the key, so the same week number in different years groups
    /// together.
    pub fn week(&self) -> u32 {
        self.sent_date.iso_week().week()
    }

    /// Splits `location_ids` on commas, trimming whitespace and dropping
    /// empty tokens. Repeated identifiers are yielded once per occurrence.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.location_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Number of empty tokens [`locations`](Self::locations) skips, e.g. the
    /// middle of `"a,,b"`. A blank cell counts as having no tokens at all.
    pub fn dropped_tokens(&self) -> usize {
        if self.location_ids.trim().is_empty() {
            return 0;
        }
        self.location_ids
            .split(',')
            .filter(|id| id.trim().is_empty())
            .count()
    }
}

/// Parses a `SentDate` value in any of the accepted timestamp shapes.
///
/// Offset-carrying timestamps keep their own wall-clock date.
pub fn parse_sent_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Reads notification records from a CSV file, gunzipping `.gz` inputs.
///
/// # Errors
///
/// Fails on I/O errors, on a missing `SentDate`/`LocationIds` column, and on
/// any non-blank `SentDate` that cannot be parsed (see [`InputError`]).
pub fn read_notifications(path: &Path) -> Result<Vec<NotificationRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    parse_notifications(reader).with_context(|| format!("reading {}", path.display()))
}

/// Parses notification records from any CSV byte source.
pub fn parse_notifications<R: Read>(reader: R) -> Result<Vec<NotificationRecord>> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let sent_idx = column_index(&headers, SENT_DATE)?;
    let loc_idx = column_index(&headers, LOCATION_IDS)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let row = result?;
        let line = row.position().map_or(0, |p| p.line());

        let raw_date = row.get(sent_idx).unwrap_or("").trim();
        if raw_date.is_empty() {
            warn!(line, "Skipping row with blank SentDate");
            skipped += 1;
            continue;
        }

        let sent_date = parse_sent_date(raw_date).ok_or_else(|| InputError::MalformedDate {
            line,
            value: raw_date.to_string(),
        })?;

        records.push(NotificationRecord {
            sent_date,
            location_ids: row.get(loc_idx).unwrap_or("").to_string(),
        });
    }

    debug!(rows = records.len(), skipped, "Parsed notification records");
    Ok(records)
}

fn column_index(headers: &StringRecord, name: &'static str) -> Result<usize, InputError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(InputError::MissingColumn(name))
}
