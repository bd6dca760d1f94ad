use crate::{
    commands::analyze::analyze_rows,
    db::{metrics::Metrics, users::Users},
    libs::{
        config::Config,
        ingest::{ingest_file, UploadLimits, ValidationStatus},
        messages::Message,
        period::UserId,
        prompt::Instruction,
    },
    msg_bail_anyhow, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// CSV or XLSX export from the BCI device
    file: PathBuf,

    #[arg(short, long)]
    user: UserId,

    /// Store the metrics without running an analysis
    #[arg(long)]
    no_analyze: bool,
}

pub async fn cmd(args: IngestArgs) -> Result<()> {
    let user = Users::new()?.get(args.user)?;
    let limits = UploadLimits {
        max_file_size_mb: Config::read()?.ingest_settings().max_file_size_mb,
    };

    let (rows, status) = ingest_file(&args.file, limits);
    if let Some(message) = rejection(&status) {
        msg_bail_anyhow!(message);
    }

    let saved = Metrics::new()?.save_bulk(user.id, &rows)?;
    msg_success!(Message::MetricsSaved(saved));

    if !args.no_analyze {
        analyze_rows(&user, &rows, Instruction::FullAnalysis).await?;
    }
    Ok(())
}

/// User-facing message for a failed validation.
pub(crate) fn rejection(status: &ValidationStatus) -> Option<Message> {
    status.reason().map(|reason| Message::IngestRejected {
        reason: reason.to_string(),
        action: status.suggested_action().to_string(),
    })
}
