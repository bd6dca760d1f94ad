//! Ingestion and validation of metric exports.
//!
//! Turns a CSV or XLSX export into typed [`MetricSample`] rows. Ingestion is
//! all-or-nothing: a file either produces every valid row together with
//! [`ValidationStatus::Success`], or no rows and a single failure status.
//!
//! ## Gates, in order
//!
//! 1. read the table (`read failure: ...`)
//! 2. find the `timestamp`/`time` column (`missing timestamp column`)
//! 3. reject a table without data rows (`empty file`)
//! 4. parse timestamps, dropping rows that fail (`no valid timestamps`)
//! 5. require every required metric column (`missing required metrics: ...`)
//! 6. require two distinct timestamps (`insufficient time range`)
//! 7. require half of the required cells filled (`too many empty values`)
//!
//! The first three and step 4 are file errors, the rest are data the user can
//! fix and re-upload.

use crate::libs::headers::{canonical_key, normalize_header, ColumnKey};
use crate::libs::metrics::{coerce, Cell, MetricKey, MetricSample};
use crate::libs::table::{read_table, RawTable, TableFormat};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Minimum share of filled required-metric cells.
pub const MIN_FILL_RATIO: f64 = 0.5;

/// Minimum number of distinct timestamps in one batch.
pub const MIN_DISTINCT_TIMESTAMPS: usize = 2;

/// Outcome of one ingestion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationStatus {
    Success,
    /// Unreadable, empty, or without a time column.
    FileError(String),
    /// Readable but below a quality gate.
    IncompleteData(String),
}

impl ValidationStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationStatus::Success)
    }

    /// Reason text for failures, `None` on success.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationStatus::Success => None,
            ValidationStatus::FileError(reason) | ValidationStatus::IncompleteData(reason) => Some(reason),
        }
    }

    /// What the user should do next.
    pub fn suggested_action(&self) -> &'static str {
        match self {
            ValidationStatus::Success => "",
            ValidationStatus::FileError(_) => "check the file format and attach it again",
            ValidationStatus::IncompleteData(_) => "fill in the missing metrics and upload the file again",
        }
    }

    pub fn into_result(self) -> Result<(), IngestError> {
        match self {
            ValidationStatus::Success => Ok(()),
            ValidationStatus::FileError(reason) => Err(IngestError::FileError(reason)),
            ValidationStatus::IncompleteData(reason) => Err(IngestError::IncompleteData(reason)),
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationStatus::Success => write!(f, "success"),
            ValidationStatus::FileError(reason) => write!(f, "file error: {}", reason),
            ValidationStatus::IncompleteData(reason) => write!(f, "incomplete data: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("file error: {0}")]
    FileError(String),
    #[error("incomplete data: {0}")]
    IncompleteData(String),
}

/// Limits applied before a file is parsed.
#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_file_size_mb: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self { max_file_size_mb: 20 }
    }
}

/// Checks extension and size, then validates the file contents.
pub fn ingest_file(path: &Path, limits: UploadLimits) -> (Vec<MetricSample>, ValidationStatus) {
    let Some(format) = TableFormat::from_path(path) else {
        return (Vec::new(), ValidationStatus::FileError("unsupported file type".into()));
    };

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return (Vec::new(), ValidationStatus::FileError(format!("read failure: {}", e))),
    };

    let limit = limits.max_file_size_mb * 1024 * 1024;
    if bytes.len() as u64 > limit {
        let size_mb = bytes.len() as f64 / (1024.0 * 1024.0);
        return (
            Vec::new(),
            ValidationStatus::FileError(format!("file too large: {:.1} MB, limit {} MB", size_mb, limits.max_file_size_mb)),
        );
    }

    validate_bytes(&bytes, format)
}

/// Parses and validates raw file bytes.
pub fn validate_bytes(bytes: &[u8], format: TableFormat) -> (Vec<MetricSample>, ValidationStatus) {
    match read_table(bytes, format) {
        Ok(table) => validate_table(&table),
        Err(e) => (Vec::new(), ValidationStatus::FileError(format!("read failure: {}", e))),
    }
}

/// Runs the validation gates on an already loaded table.
pub fn validate_table(table: &RawTable) -> (Vec<MetricSample>, ValidationStatus) {
    let fail = |status: ValidationStatus| (Vec::new(), status);

    let Some(ts_column) = find_timestamp_column(&table.headers) else {
        return fail(ValidationStatus::FileError("missing timestamp column".into()));
    };

    if table.is_empty() {
        return fail(ValidationStatus::FileError("empty file".into()));
    }

    let valid: Vec<(usize, NaiveDateTime)> = (0..table.rows.len())
        .filter_map(|row| parse_timestamp(table.cell(row, ts_column)).map(|ts| (row, ts)))
        .collect();
    if valid.is_empty() {
        return fail(ValidationStatus::FileError("no valid timestamps".into()));
    }

    let columns = metric_columns(&table.headers);

    let missing: Vec<&str> = MetricKey::REQUIRED
        .iter()
        .filter(|key| !columns.iter().any(|(_, k)| k == *key))
        .map(|key| key.as_str())
        .collect();
    if !missing.is_empty() {
        return fail(ValidationStatus::IncompleteData(format!("missing required metrics: {}", missing.join(", "))));
    }

    let distinct: HashSet<NaiveDateTime> = valid.iter().map(|(_, ts)| *ts).collect();
    if distinct.len() < MIN_DISTINCT_TIMESTAMPS {
        return fail(ValidationStatus::IncompleteData("insufficient time range".into()));
    }

    let total_cells = valid.len() * MetricKey::REQUIRED.len();
    let filled_cells = valid
        .iter()
        .map(|(row, _)| {
            columns
                .iter()
                .filter(|(_, key)| key.is_required())
                .filter(|(column, key)| coerce(table.cell(*row, *column), key.kind()).is_some())
                .count()
        })
        .sum::<usize>();
    if fill_ratio(filled_cells, total_cells) < MIN_FILL_RATIO {
        return fail(ValidationStatus::IncompleteData("too many empty values".into()));
    }

    let rows = valid
        .iter()
        .map(|(row, ts)| {
            let mut sample = MetricSample::new(*ts);
            for (column, key) in &columns {
                sample.set(*key, coerce(table.cell(*row, *column), key.kind()));
            }
            sample
        })
        .collect();

    (rows, ValidationStatus::Success)
}

/// Share of filled cells; zero when there is nothing to fill.
pub fn fill_ratio(filled: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        filled as f64 / total as f64
    }
}

/// `timestamp` wins over `time` when a file carries both.
fn find_timestamp_column(headers: &[String]) -> Option<usize> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    normalized
        .iter()
        .position(|h| h == "timestamp")
        .or_else(|| normalized.iter().position(|h| h == "time"))
}

/// Known metric columns with their index. The first column wins when two
/// labels map to the same metric.
fn metric_columns(headers: &[String]) -> Vec<(usize, MetricKey)> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .enumerate()
        .filter_map(|(index, header)| match canonical_key(header) {
            ColumnKey::Metric(key) if seen.insert(key) => Some((index, key)),
            _ => None,
        })
        .collect()
}

const ZONED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M%:z",
    // Hour-only offsets such as `+03`.
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
    "%Y-%m-%dT%H:%M%#z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d %b %Y %H:%M:%S%.f",
    "%d %b %Y %H:%M",
    "%b %d %Y %H:%M:%S%.f",
    "%b %d %Y %H:%M",
    "%b %d, %Y %H:%M:%S%.f",
    "%b %d, %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y", "%d %b %Y", "%b %d %Y", "%b %d, %Y"];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// Parses a timestamp cell into UTC without a zone.
///
/// Offsets are converted to UTC and dropped; values without an offset are
/// taken as UTC. Bare numbers are read as Unix seconds, bare dates as
/// midnight and bare times of day as that time on the current UTC date.
pub fn parse_timestamp(cell: &Cell) -> Option<NaiveDateTime> {
    match cell {
        Cell::Empty => None,
        Cell::DateTime(dt) => Some(*dt),
        Cell::Number(n) => from_unix_seconds(*n),
        Cell::Text(raw) => parse_timestamp_str(raw),
    }
}

pub fn parse_timestamp_str(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    if let Some(stripped) = raw.strip_suffix(" UTC").or_else(|| raw.strip_suffix('Z')) {
        if let Some(dt) = parse_naive(stripped.trim_end()) {
            return Some(dt);
        }
    }
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc).naive_utc());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    if let Some(dt) = parse_naive(raw) {
        return Some(dt);
    }

    raw.parse::<f64>().ok().and_then(from_unix_seconds)
}

fn parse_naive(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .or_else(|| {
            TIME_FORMATS
                .iter()
                .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
                .map(|time| Utc::now().date_naive().and_time(time))
        })
}

fn from_unix_seconds(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}
