//! `notify`: flips a user's reminders on or off.
//!
//! The command runs a short-lived scheduler seeded from the store, so the
//! toggle sees the same state a running `watch` daemon would. The new flag
//! is persisted; the daemon picks it up on its next resync.

use crate::{
    db::{periods::SqliteStore, users::Users},
    libs::{
        clock::TokioClock,
        messages::Message,
        notify::ConsoleSender,
        period::{PeriodStore, UserId},
        scheduler::Scheduler,
    },
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;
use clap::Args;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct NotifyArgs {
    #[arg(short, long)]
    user: UserId,
}

/// A scheduler over the database whose jobs live only as long as it does.
pub(crate) fn local_scheduler(store: Arc<SqliteStore>) -> Scheduler {
    Scheduler::new(Arc::new(TokioClock::new()), store, Arc::new(ConsoleSender))
}

pub fn cmd(args: NotifyArgs) -> Result<()> {
    let user = Users::new()?.get(args.user)?;
    let store = Arc::new(SqliteStore::new()?);
    let scheduler = local_scheduler(Arc::clone(&store));

    scheduler.bootstrap()?;
    if scheduler.toggle(user.id)? {
        let jobs = scheduler.active_jobs(user.id).len();
        if jobs == 0 {
            msg_warning!(Message::NotificationsEnabledNoPeriods);
        } else {
            msg_success!(Message::NotificationsEnabled(jobs));
        }
    } else {
        msg_success!(Message::NotificationsDisabled);
    }

    if store.load_periods(user.id)?.is_empty() {
        msg_info!(Message::RunAnalysisFirst(user.id));
    }
    Ok(())
}
