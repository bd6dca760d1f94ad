//! Spreadsheet column label normalization.
//!
//! Exports from different headset apps spell the same metric in many ways:
//! `Cognitive Score`, `cognitive_score`, ` COGNITIVE-score `. Every label is
//! first reduced to a canonical lowercase spelling and then looked up in a
//! fixed alias table that yields the internal metric key.
//!
//! ## Usage
//!
//! ```rust
//! use brainclock::libs::headers::{canonical_key, normalize_header, ColumnKey};
//! use brainclock::libs::metrics::MetricKey;
//!
//! assert_eq!(normalize_header("\u{feff} Heart_Rate "), "heart rate");
//! assert_eq!(canonical_key("self-control"), ColumnKey::Metric(MetricKey::SelfControl));
//! assert_eq!(canonical_key("Time"), ColumnKey::Timestamp);
//! ```

use crate::libs::metrics::MetricKey;

/// Spellings accepted for each metric, in normalized form.
///
/// Keys here are already passed through [`normalize_header`], so
/// `self-control`, `Self_Control` and `self control` all land on one entry.
const METRIC_ALIASES: &[(&str, MetricKey)] = &[
    ("cognitive score", MetricKey::CognitiveScore),
    ("focus", MetricKey::Focus),
    ("chill", MetricKey::Chill),
    ("stress", MetricKey::Stress),
    ("self control", MetricKey::SelfControl),
    ("anger", MetricKey::Anger),
    ("relaxation index", MetricKey::RelaxationIndex),
    ("concentration index", MetricKey::ConcentrationIndex),
    ("fatique score", MetricKey::FatiqueScore),
    ("fatigue score", MetricKey::FatiqueScore),
    ("reverse fatique", MetricKey::ReverseFatique),
    ("reverse fatigue", MetricKey::ReverseFatique),
    ("alpha gravity", MetricKey::AlphaGravity),
    ("heart rate", MetricKey::HeartRate),
];

/// What a normalized column label refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Timestamp,
    Metric(MetricKey),
    /// Unknown column, ignored downstream.
    Unmapped,
}

/// Reduces a raw column label to its canonical lowercase spelling.
///
/// Drops byte-order marks, turns underscores and hyphens into spaces,
/// collapses runs of whitespace and lowercases the result.
pub fn normalize_header(raw: &str) -> String {
    let cleaned: String = raw
        .replace('\u{feff}', "")
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Maps a raw column label to the column it represents.
///
/// `timestamp` and `time` both identify the time column.
pub fn canonical_key(raw: &str) -> ColumnKey {
    let normalized = normalize_header(raw);

    if normalized == "timestamp" || normalized == "time" {
        return ColumnKey::Timestamp;
    }

    METRIC_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, key)| ColumnKey::Metric(*key))
        .unwrap_or(ColumnKey::Unmapped)
}
