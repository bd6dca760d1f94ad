//! Metric keys, sample rows and numeric cell coercion.
//!
//! A [`MetricSample`] is one timestamped observation from a headset export.
//! Counts are stored as integers, indices and scores as floats, and every
//! field is independently nullable.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared storage type of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Int,
    Float,
}

/// Every metric the ingestion pipeline knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    CognitiveScore,
    Focus,
    Chill,
    Stress,
    SelfControl,
    Anger,
    RelaxationIndex,
    ConcentrationIndex,
    FatiqueScore,
    ReverseFatique,
    AlphaGravity,
    HeartRate,
}

impl MetricKey {
    /// All keys in storage and prompt order.
    pub const ALL: [MetricKey; 12] = [
        MetricKey::CognitiveScore,
        MetricKey::Focus,
        MetricKey::Chill,
        MetricKey::Stress,
        MetricKey::SelfControl,
        MetricKey::Anger,
        MetricKey::RelaxationIndex,
        MetricKey::ConcentrationIndex,
        MetricKey::FatiqueScore,
        MetricKey::ReverseFatique,
        MetricKey::AlphaGravity,
        MetricKey::HeartRate,
    ];

    /// Metrics that must be present as columns for a file to be analyzable.
    pub const REQUIRED: [MetricKey; 4] = [MetricKey::CognitiveScore, MetricKey::Focus, MetricKey::Chill, MetricKey::Stress];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::CognitiveScore => "cognitive_score",
            MetricKey::Focus => "focus",
            MetricKey::Chill => "chill",
            MetricKey::Stress => "stress",
            MetricKey::SelfControl => "self_control",
            MetricKey::Anger => "anger",
            MetricKey::RelaxationIndex => "relaxation_index",
            MetricKey::ConcentrationIndex => "concentration_index",
            MetricKey::FatiqueScore => "fatique_score",
            MetricKey::ReverseFatique => "reverse_fatique",
            MetricKey::AlphaGravity => "alpha_gravity",
            MetricKey::HeartRate => "heart_rate",
        }
    }

    pub fn kind(&self) -> NumericKind {
        match self {
            MetricKey::CognitiveScore
            | MetricKey::Focus
            | MetricKey::Chill
            | MetricKey::Stress
            | MetricKey::SelfControl
            | MetricKey::Anger
            | MetricKey::HeartRate => NumericKind::Int,
            MetricKey::RelaxationIndex
            | MetricKey::ConcentrationIndex
            | MetricKey::FatiqueScore
            | MetricKey::ReverseFatique
            | MetricKey::AlphaGravity => NumericKind::Float,
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coerced metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A raw spreadsheet cell before typing.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => n.is_nan(),
            Cell::DateTime(_) => false,
        }
    }
}

/// Coerces a cell to the declared numeric kind.
///
/// A direct typed parse is tried first, then a float parse retargeted to the
/// declared kind. Anything else yields `None`; a single bad cell never fails
/// ingestion.
pub fn coerce(cell: &Cell, kind: NumericKind) -> Option<MetricValue> {
    let number = match cell {
        Cell::Empty | Cell::DateTime(_) => return None,
        Cell::Number(n) => *n,
        Cell::Text(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            if kind == NumericKind::Int {
                if let Ok(v) = raw.parse::<i64>() {
                    return Some(MetricValue::Int(v));
                }
            }
            raw.replace(',', ".").parse::<f64>().ok()?
        }
    };

    if !number.is_finite() {
        return None;
    }

    match kind {
        // Truncates toward zero, like an int() cast.
        NumericKind::Int => {
            let truncated = number.trunc();
            if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
                None
            } else {
                Some(MetricValue::Int(truncated as i64))
            }
        }
        NumericKind::Float => Some(MetricValue::Float(number)),
    }
}

/// One timestamped observation.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// UTC, zone dropped.
    pub timestamp: NaiveDateTime,
    pub cognitive_score: Option<i64>,
    pub focus: Option<i64>,
    pub chill: Option<i64>,
    pub stress: Option<i64>,
    pub self_control: Option<i64>,
    pub anger: Option<i64>,
    pub relaxation_index: Option<f64>,
    pub concentration_index: Option<f64>,
    pub fatique_score: Option<f64>,
    pub reverse_fatique: Option<f64>,
    pub alpha_gravity: Option<f64>,
    pub heart_rate: Option<i64>,
}

impl MetricSample {
    /// Creates a sample with every metric null.
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            cognitive_score: None,
            focus: None,
            chill: None,
            stress: None,
            self_control: None,
            anger: None,
            relaxation_index: None,
            concentration_index: None,
            fatique_score: None,
            reverse_fatique: None,
            alpha_gravity: None,
            heart_rate: None,
        }
    }

    pub fn get(&self, key: MetricKey) -> Option<MetricValue> {
        match key {
            MetricKey::CognitiveScore => self.cognitive_score.map(MetricValue::Int),
            MetricKey::Focus => self.focus.map(MetricValue::Int),
            MetricKey::Chill => self.chill.map(MetricValue::Int),
            MetricKey::Stress => self.stress.map(MetricValue::Int),
            MetricKey::SelfControl => self.self_control.map(MetricValue::Int),
            MetricKey::Anger => self.anger.map(MetricValue::Int),
            MetricKey::RelaxationIndex => self.relaxation_index.map(MetricValue::Float),
            MetricKey::ConcentrationIndex => self.concentration_index.map(MetricValue::Float),
            MetricKey::FatiqueScore => self.fatique_score.map(MetricValue::Float),
            MetricKey::ReverseFatique => self.reverse_fatique.map(MetricValue::Float),
            MetricKey::AlphaGravity => self.alpha_gravity.map(MetricValue::Float),
            MetricKey::HeartRate => self.heart_rate.map(MetricValue::Int),
        }
    }

    /// Stores a value, retargeting it to the key's declared kind.
    pub fn set(&mut self, key: MetricKey, value: Option<MetricValue>) {
        let as_int = value.map(|v| match v {
            MetricValue::Int(i) => i,
            MetricValue::Float(f) => f.trunc() as i64,
        });
        let as_float = value.map(|v| match v {
            MetricValue::Int(i) => i as f64,
            MetricValue::Float(f) => f,
        });

        match key {
            MetricKey::CognitiveScore => self.cognitive_score = as_int,
            MetricKey::Focus => self.focus = as_int,
            MetricKey::Chill => self.chill = as_int,
            MetricKey::Stress => self.stress = as_int,
            MetricKey::SelfControl => self.self_control = as_int,
            MetricKey::Anger => self.anger = as_int,
            MetricKey::RelaxationIndex => self.relaxation_index = as_float,
            MetricKey::ConcentrationIndex => self.concentration_index = as_float,
            MetricKey::FatiqueScore => self.fatique_score = as_float,
            MetricKey::ReverseFatique => self.reverse_fatique = as_float,
            MetricKey::AlphaGravity => self.alpha_gravity = as_float,
            MetricKey::HeartRate => self.heart_rate = as_int,
        }
    }
}
