use crate::{
    commands::notify::local_scheduler,
    db::{periods::SqliteStore, users::Users},
    libs::{
        messages::Message,
        period::{parse_period_time, UserId},
    },
    msg_bail_anyhow, msg_info,
};
use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct NowArgs {
    #[arg(short, long)]
    user: UserId,

    /// Time of day as HH:MM; defaults to the current local time
    #[arg(long)]
    at: Option<String>,
}

pub fn cmd(args: NowArgs) -> Result<()> {
    let user = Users::new()?.get(args.user)?;
    let at = match args.at.as_deref() {
        Some(raw) => match parse_period_time(raw) {
            Some(t) => t,
            None => msg_bail_anyhow!(Message::InvalidTimeFormat(raw.to_string())),
        },
        None => Local::now().time(),
    };

    let scheduler = local_scheduler(Arc::new(SqliteStore::new()?));
    let hhmm = at.format("%H:%M").to_string();
    match scheduler.find_period_for_time(user.id, at)? {
        Some(period) if period.contains(at) => msg_info!(Message::CurrentPeriod(hhmm, period.to_string())),
        Some(period) => msg_info!(Message::NextPeriod(hhmm, period.to_string())),
        None => msg_info!(Message::NoPeriodAt(hhmm)),
    }
    Ok(())
}
