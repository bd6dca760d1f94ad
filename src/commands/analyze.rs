//! `analyze`, `plan` and `improve`: one prompt over the stored metrics.

use crate::{
    db::{metrics::Metrics, periods::SqliteStore, recommendations::Recommendations, users::Users},
    libs::{
        analysis::{persist_result, run_analysis, Persisted},
        config::Config,
        llm::analyzer_for,
        messages::Message,
        metrics::MetricSample,
        period::{AnalysisResult, UserId},
        prompt::{build_prompt, Instruction, PROMPT_ROW_LIMIT},
        user::User,
    },
    msg_bail_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[arg(short, long)]
    user: UserId,
}

pub async fn cmd(args: AnalyzeArgs, instruction: Instruction) -> Result<()> {
    let user = Users::new()?.get(args.user)?;
    let rows = Metrics::new()?.load(user.id, PROMPT_ROW_LIMIT)?;
    if rows.is_empty() {
        msg_bail_anyhow!(Message::NoMetricsFound(user.id));
    }
    analyze_rows(&user, &rows, instruction).await?;
    Ok(())
}

/// Sends `rows` to the configured analyzer, stores what came back and prints
/// a preview.
pub(crate) async fn analyze_rows(user: &User, rows: &[MetricSample], instruction: Instruction) -> Result<AnalysisResult> {
    let config = Config::read()?;
    let settings = config.llm_settings();
    if settings.is_none() {
        msg_info!(Message::UsingMockAnalyzer);
    }
    let analyzer = analyzer_for(settings)?;
    let prompt = build_prompt(&user.name, user.iaf, rows, instruction, config.scheduler_settings().display_utc);

    msg_info!(Message::AnalysisStarted(rows.len()));
    let outcome = match run_analysis(analyzer.as_ref(), &prompt).await {
        Ok(outcome) => outcome,
        Err(e) => msg_bail_anyhow!(Message::AnalysisFailed(e.to_string())),
    };
    let result = outcome.result;

    if result.is_empty() {
        msg_warning!(Message::AnalysisEmpty);
        return Ok(result);
    }

    let store = SqliteStore::new()?;
    let mut recommendations = Recommendations::new()?;
    let persisted = persist_result(&store, &mut recommendations, user.id, &result, instruction)?;
    report_persisted(&persisted);

    msg_print!(Message::AnalysisPreviewHeader, true);
    for line in preview_lines(&result, instruction) {
        msg_print!(line);
    }
    Ok(result)
}

fn report_persisted(persisted: &Persisted) {
    if persisted.periods > 0 {
        msg_success!(Message::PeriodsSaved(persisted.periods));
    }
    if persisted.day_plan {
        msg_success!(Message::DayPlanSaved);
    }
    if persisted.suggestions > 0 {
        msg_success!(Message::SuggestionsSaved(persisted.suggestions));
    }
}

fn preview_lines(result: &AnalysisResult, instruction: Instruction) -> Vec<String> {
    match instruction {
        Instruction::FullAnalysis => result.preview(),
        Instruction::DayPlan => vec![result.day_plan.clone()],
        Instruction::Improvements => result.improvement_suggestions.iter().map(|s| format!("• {}", s)).collect(),
    }
}
