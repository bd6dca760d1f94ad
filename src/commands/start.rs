//! Guided session: IAF, file upload, analysis, reminders.
//!
//! Walks one user through the same steps a chat front end would, driven by
//! the [`SessionStore`] state machine. A rejected upload keeps the session
//! waiting for a file so the user can retry.

use crate::{
    commands::{analyze::analyze_rows, ingest::rejection, notify::local_scheduler},
    db::{metrics::Metrics, periods::SqliteStore, users::Users},
    libs::{
        config::Config,
        ingest::{ingest_file, UploadLimits},
        messages::Message,
        metrics::MetricSample,
        period::UserId,
        prompt::Instruction,
        session::SessionStore,
        user::{parse_iaf, User},
    },
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Existing user id; a new user is created when omitted
    #[arg(short, long, conflicts_with = "name")]
    user: Option<UserId>,

    /// Name for a new user
    #[arg(short, long)]
    name: Option<String>,
}

pub async fn cmd(args: StartArgs) -> Result<()> {
    let mut users = Users::new()?;
    let user = match (args.user, args.name) {
        (Some(id), _) => users.get(id)?,
        (None, Some(name)) => users.get_or_create(None, &name)?,
        (None, None) => {
            let name: String = Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptUserName.to_string())
                .interact_text()?;
            users.get_or_create(None, &name)?
        }
    };

    let sessions = SessionStore::new();
    sessions.start(user.id);
    msg_print!(Message::SessionWelcome(user.name.clone()), true);

    let user = ask_iaf(&sessions, &mut users, user)?;
    let rows = ask_file(&sessions, &user)?;

    analyze_rows(&user, &rows, Instruction::FullAnalysis).await?;
    let state = sessions.complete_analysis(user.id);
    debug!(user_id = user.id, %state, "session advanced");

    let enable = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(Message::PromptEnableNotifications.to_string())
        .default(false)
        .interact()?;
    if enable {
        let scheduler = local_scheduler(Arc::new(SqliteStore::new()?));
        scheduler.bootstrap()?;
        if !scheduler.is_enabled(user.id) {
            scheduler.toggle(user.id)?;
        }
        msg_success!(Message::NotificationsEnabled(scheduler.active_jobs(user.id).len()));
        msg_info!(Message::WatcherHint);
    }

    sessions.reset(user.id);
    msg_print!(Message::SessionFinished);
    Ok(())
}

fn ask_iaf(sessions: &SessionStore, users: &mut Users, user: User) -> Result<User> {
    sessions.request_iaf(user.id);
    let theme = ColorfulTheme::default();
    loop {
        let mut prompt = Input::<String>::with_theme(&theme);
        prompt = prompt.with_prompt(Message::PromptIaf.to_string()).allow_empty(true);
        if let Some(iaf) = user.iaf {
            prompt = prompt.default(format!("{:.1}", iaf));
        }
        let raw = prompt.interact_text()?;

        if raw.trim().is_empty() {
            sessions.accept_iaf(user.id)?;
            return Ok(user);
        }
        match parse_iaf(&raw) {
            Ok(iaf) => {
                users.set_iaf(user.id, iaf)?;
                msg_success!(Message::IafSaved(iaf));
                sessions.accept_iaf(user.id)?;
                return users.get(user.id);
            }
            Err(e) => msg_error!(Message::IafInvalid(e.to_string())),
        }
    }
}

fn ask_file(sessions: &SessionStore, user: &User) -> Result<Vec<MetricSample>> {
    let limits = UploadLimits {
        max_file_size_mb: Config::read()?.ingest_settings().max_file_size_mb,
    };
    sessions.request_file(user.id);

    loop {
        let path: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptFilePath.to_string())
            .interact_text()?;
        let state = sessions.accept_file(user.id)?;
        debug!(user_id = user.id, %state, "file received");

        let (rows, status) = ingest_file(&PathBuf::from(path.trim()), limits);
        match rejection(&status) {
            None => {
                let saved = Metrics::new()?.save_bulk(user.id, &rows)?;
                msg_success!(Message::MetricsSaved(saved));
                return Ok(rows);
            }
            Some(message) => {
                msg_error!(message);
                let retry = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::PromptRetryUpload.to_string())
                    .default(true)
                    .interact()?;
                if !retry {
                    sessions.reset(user.id);
                    anyhow::bail!(Message::SessionAborted);
                }
            }
        }
    }
}
