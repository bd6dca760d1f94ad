//! One analysis round trip: prompt in, structured result out.
//!
//! The model's raw answer is kept next to the parsed result so a failed
//! extraction can show the user what actually came back.

use crate::db::recommendations::Recommendations;
use crate::libs::extract::{excerpt, extract_json, ExtractionError};
use crate::libs::llm::{Analyzer, LlmError};
use crate::libs::period::{AnalysisResult, PeriodStore, UserId};
use crate::libs::prompt::Instruction;
use anyhow::Result;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("{error}\n\nModel answer:\n{excerpt}")]
    Extraction { error: ExtractionError, excerpt: String },
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub raw: String,
}

pub async fn run_analysis(analyzer: &dyn Analyzer, prompt: &str) -> Result<AnalysisOutcome, AnalysisError> {
    let raw = analyzer.analyze(prompt).await?;
    let object = extract_json(&raw).map_err(|error| AnalysisError::Extraction {
        error,
        excerpt: excerpt(&raw).to_string(),
    })?;
    let result = AnalysisResult::from_object(&object);
    debug!(
        periods = result.periods.len(),
        suggestions = result.improvement_suggestions.len(),
        "analysis parsed"
    );
    Ok(AnalysisOutcome { result, raw })
}

/// What [`persist_result`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Persisted {
    pub periods: usize,
    pub day_plan: bool,
    pub suggestions: usize,
}

/// Stores the parts of `result` that `instruction` asked for.
///
/// Periods replace the stored set only when the answer contains some, so an
/// answer without periods keeps the previous schedule.
pub fn persist_result(
    store: &dyn PeriodStore,
    recommendations: &mut Recommendations,
    user_id: UserId,
    result: &AnalysisResult,
    instruction: Instruction,
) -> Result<Persisted> {
    let mut persisted = Persisted::default();

    if instruction == Instruction::FullAnalysis && !result.periods.is_empty() {
        store.save_periods(user_id, &result.periods)?;
        persisted.periods = result.periods.len();
    }

    if matches!(instruction, Instruction::FullAnalysis | Instruction::DayPlan) && !result.day_plan.trim().is_empty() {
        recommendations.save_day_plan(user_id, &result.day_plan)?;
        persisted.day_plan = true;
    }

    if matches!(instruction, Instruction::FullAnalysis | Instruction::Improvements) {
        persisted.suggestions = recommendations.save_suggestions(user_id, &result.improvement_suggestions)?;
    }

    Ok(persisted)
}
