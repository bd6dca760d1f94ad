//! Prompt text sent to the language model.
//!
//! A prompt is the user's name, the IAF when known, one line per metric row
//! and an instruction, followed by the JSON shape the answer must have.

use crate::libs::metrics::{MetricKey, MetricSample};
use chrono::{Local, TimeZone, Utc};

/// Rows included in plan and improvement prompts.
pub const PROMPT_ROW_LIMIT: usize = 120;

const JSON_CONTRACT: &str = r#"Return ONLY valid JSON like:
{
  "productivity_periods":[{"start_time":"11:00","end_time":"12:00","recommended_activity":"complex tasks"}],
  "day_plan":"11:00-12:00 complex tasks; 14:00-14:30 rest; sleep before 23:00",
  "improvement_suggestions":["30min breaks each hour in the morning","10min meditation after lunch"]
}"#;

/// What the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Productivity periods, a day plan and suggestions.
    FullAnalysis,
    /// Only `day_plan`.
    DayPlan,
    /// Only `improvement_suggestions`.
    Improvements,
}

impl Instruction {
    pub fn text(&self) -> &'static str {
        match self {
            Instruction::FullAnalysis => {
                "You are an expert in human neurophysiology and psychophysiology who analyzes BCI/EEG data \
and cognitive patterns. Use evidence-based findings on alpha rhythm and individual alpha frequency to build \
an individual profile of the user's state.

Required:
1. Analyze the data, taking into account different activity types and sessions recorded at different times.
2. Find the optimal performance indicators and the current state.
3. Determine precisely:
   - the best hours of the day for demanding work;
   - windows of overload and loss of focus.

Answer format is strict JSON:
{
  \"productivity_periods\": [
    {\"start_time\": \"HH:MM\", \"end_time\": \"HH:MM\", \"recommended_activity\": \"string\"}
  ],
  \"day_plan\": \"string\",
  \"improvement_suggestions\": [\"string\", \"string\"]
}"
            }
            Instruction::DayPlan => {
                "You are an expert in human neurophysiology. Using the BCI/EEG metrics and knowledge of \
circadian rhythms, build a personal day schedule (day_plan). It must contain:
- hours of peak productivity for demanding tasks;
- rest and relaxation windows;
- the best time to go to sleep.

Return strict JSON with the key \"day_plan\"."
            }
            Instruction::Improvements => {
                "You are an expert in neuropsychophysiology. Based on the cognitive patterns and the user's \
current schedule, suggest concrete steps to improve the daily routine. Focus on:
- targeted changes that raise productivity;
- reducing fatigue;
- ways to recover resources.

Return strict JSON with the key \"improvement_suggestions\" (array of strings)."
            }
        }
    }
}

/// Renders one metric row as `"<time> | key:value, ..."`.
///
/// Timestamps are stored as UTC. With `display_utc` they are printed as such
/// with a ` UTC` suffix, otherwise converted to local time.
pub fn format_row(row: &MetricSample, display_utc: bool) -> String {
    let time = if display_utc {
        row.timestamp.format("%Y-%m-%d %H:%M UTC").to_string()
    } else {
        Utc.from_utc_datetime(&row.timestamp)
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    };

    let pairs: Vec<String> = MetricKey::ALL
        .iter()
        .map(|key| match row.get(*key) {
            Some(value) => format!("{}:{}", key, value),
            None => format!("{}:None", key),
        })
        .collect();

    format!("{} | {}", time, pairs.join(", "))
}

pub fn build_prompt(user_name: &str, iaf: Option<f64>, rows: &[MetricSample], instruction: Instruction, display_utc: bool) -> String {
    let table: Vec<String> = rows.iter().map(|row| format_row(row, display_utc)).collect();

    let mut prompt = String::from("You analyze EEG/BCI metrics and produce actionable schedules.\n");
    prompt.push_str(&format!("User: {}\n", user_name));
    if let Some(iaf) = iaf {
        prompt.push_str(&format!("Individual alpha frequency (IAF): {} Hz\n", iaf));
    }
    prompt.push_str("\nMetrics (time | key:value):\n");
    prompt.push_str(&table.join("\n"));
    prompt.push_str("\n\n");
    prompt.push_str(instruction.text());
    prompt.push_str("\n\n");
    prompt.push_str(JSON_CONTRACT);
    prompt.push('\n');
    prompt
}
