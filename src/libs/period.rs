//! Productivity periods and the analysis result they come from.
//!
//! A [`ProductivityPeriod`] is a recurring daily window `[start, end)` with a
//! recommended activity. Periods carry no date; a new analysis replaces the
//! user's whole set.

use chrono::NaiveTime;
use serde_json::{Map, Value};
use std::fmt;

/// Database id of a user.
pub type UserId = i64;

/// Periods shown in a short preview.
pub const PREVIEW_PERIODS: usize = 5;
/// Suggestions shown in a short preview.
pub const PREVIEW_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct ProductivityPeriod {
    /// Inclusive.
    pub start_time: NaiveTime,
    /// Exclusive.
    pub end_time: NaiveTime,
    pub recommended_activity: String,
    pub productivity_score: f64,
}

impl ProductivityPeriod {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime, recommended_activity: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            recommended_activity: recommended_activity.into(),
            productivity_score: 0.0,
        }
    }

    /// Half-open containment; windows crossing midnight never match.
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start_time <= t && t < self.end_time
    }
}

impl fmt::Display for ProductivityPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}–{}: {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M"),
            self.recommended_activity
        )
    }
}

/// Returns the period containing `t`, else the next one to start after `t`.
///
/// Pure read; `None` when `t` is past the last start of the day.
pub fn find_period_for_time(periods: &[ProductivityPeriod], t: NaiveTime) -> Option<&ProductivityPeriod> {
    periods.iter().find(|p| p.contains(t)).or_else(|| {
        periods
            .iter()
            .filter(|p| p.start_time > t)
            .min_by_key(|p| p.start_time)
    })
}

/// Parses `HH:MM`, ignoring anything after the fifth character.
///
/// Models often answer `10:00:00` or `10:00 AM`; only the leading hour and
/// minute count.
pub fn parse_period_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    let head: String = raw.chars().take(5).collect();
    NaiveTime::parse_from_str(head.trim(), "%H:%M").ok()
}

/// Structured answer of one analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    pub periods: Vec<ProductivityPeriod>,
    pub day_plan: String,
    pub improvement_suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Builds a result from an extracted JSON object.
    ///
    /// Missing keys fall back to empty values. Period entries without a
    /// parsable start or end are skipped.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let periods = object
            .get("productivity_periods")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(period_from_value).collect())
            .unwrap_or_default();

        let day_plan = match object.get("day_plan") {
            Some(Value::String(plan)) => plan.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let improvement_suggestions = match object.get("improvement_suggestions") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
            Some(Value::String(single)) if !single.trim().is_empty() => vec![single.clone()],
            _ => Vec::new(),
        };

        Self {
            periods,
            day_plan,
            improvement_suggestions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() && self.day_plan.trim().is_empty() && self.improvement_suggestions.is_empty()
    }

    /// Lines of the short preview shown after an analysis.
    pub fn preview(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.periods.iter().take(PREVIEW_PERIODS).map(|p| p.to_string()).collect();
        if !self.day_plan.trim().is_empty() {
            lines.push(format!("Day plan: {}", self.day_plan));
        }
        lines.extend(
            self.improvement_suggestions
                .iter()
                .take(PREVIEW_SUGGESTIONS)
                .map(|s| format!("• {}", s)),
        );
        lines
    }
}

fn period_from_value(value: &Value) -> Option<ProductivityPeriod> {
    let entry = value.as_object()?;
    let start_time = parse_period_time(entry.get("start_time")?.as_str()?)?;
    let end_time = parse_period_time(entry.get("end_time")?.as_str()?)?;

    let recommended_activity = entry
        .get("recommended_activity")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let productivity_score = match entry.get("productivity_score") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };

    Some(ProductivityPeriod {
        start_time,
        end_time,
        recommended_activity,
        productivity_score,
    })
}

/// Persistence the scheduler reads periods and notification flags from.
pub trait PeriodStore: Send + Sync {
    fn load_periods(&self, user_id: UserId) -> anyhow::Result<Vec<ProductivityPeriod>>;

    /// Replaces every stored period of the user.
    fn save_periods(&self, user_id: UserId, periods: &[ProductivityPeriod]) -> anyhow::Result<()>;

    fn load_users(&self) -> anyhow::Result<Vec<UserId>>;

    fn notifications_enabled(&self, user_id: UserId) -> anyhow::Result<bool>;

    fn set_notifications_enabled(&self, user_id: UserId, enabled: bool) -> anyhow::Result<()>;
}
