//! Per-user recurring reminders for productivity periods.
//!
//! The [`Scheduler`] owns a registry of the jobs created for each user and
//! keeps it equal to the image of the user's current period set: one daily
//! trigger per period, fired at the period's start.
//!
//! ## Job identity
//!
//! Jobs are keyed by [`JobKey`] (user id plus start hour and minute), so
//! registering the same periods twice yields the same job set.
//!
//! ## Failure policy
//!
//! A failure to add or remove a single trigger is logged and skipped; the rest
//! of the user's jobs are still processed. Reminder delivery is at most once:
//! a failed send is logged and not retried.
//!
//! ## Locking
//!
//! Register, unregister and toggle run under one registry lock, so a teardown
//! and the following re-creation for a user never interleave with another
//! mutation.

use crate::libs::clock::{JobCallback, JobFuture, TriggerClock};
use crate::libs::messages::Message;
use crate::libs::notify::NotificationSender;
use crate::libs::period::{find_period_for_time, PeriodStore, ProductivityPeriod, UserId};
use chrono::{NaiveTime, Timelike};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("trigger error: {0}")]
    Trigger(String),
    #[error("store error: {0}")]
    Store(String),
}

/// Deterministic id of one reminder job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobKey {
    pub user_id: UserId,
    pub hour: u32,
    pub minute: u32,
}

impl JobKey {
    pub fn new(user_id: UserId, start_time: NaiveTime) -> Self {
        Self {
            user_id,
            hour: start_time.hour(),
            minute: start_time.minute(),
        }
    }
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "period_{}_{:02}{:02}", self.user_id, self.hour, self.minute)
    }
}

/// What a resync did for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Unchanged,
    Enabled,
    Disabled,
    Rescheduled,
}

#[derive(Debug, Default)]
struct UserJobs {
    jobs: BTreeSet<JobKey>,
    periods: Vec<ProductivityPeriod>,
}

pub struct Scheduler {
    clock: Arc<dyn TriggerClock>,
    store: Arc<dyn PeriodStore>,
    sender: Arc<dyn NotificationSender>,
    /// Users present here are enabled.
    registry: Mutex<HashMap<UserId, UserJobs>>,
}

impl Scheduler {
    pub fn new(clock: Arc<dyn TriggerClock>, store: Arc<dyn PeriodStore>, sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            clock,
            store,
            sender,
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Replaces every job of the user with one job per period.
    ///
    /// Returns the number of jobs now active for the user.
    pub fn register(&self, user_id: UserId, periods: &[ProductivityPeriod]) -> usize {
        let mut registry = self.registry.lock();
        self.register_locked(&mut registry, user_id, periods)
    }

    fn register_locked(&self, registry: &mut HashMap<UserId, UserJobs>, user_id: UserId, periods: &[ProductivityPeriod]) -> usize {
        let entry = registry.entry(user_id).or_default();

        for job in std::mem::take(&mut entry.jobs) {
            if let Err(err) = self.clock.cancel(&job) {
                warn!(user_id, job = %job, error = %err, "failed to remove trigger");
            }
        }

        for period in periods {
            let key = JobKey::new(user_id, period.start_time);
            let callback = self.reminder_callback(user_id, key.clone(), period);
            match self.clock.schedule_daily(key.hour, key.minute, callback, &key, true) {
                Ok(()) => {
                    entry.jobs.insert(key);
                }
                Err(err) => warn!(user_id, job = %key, error = %err, "failed to add trigger"),
            }
        }
        entry.periods = periods.to_vec();

        debug!(user_id, jobs = entry.jobs.len(), "periods registered");
        entry.jobs.len()
    }

    /// Removes every job of the user. Safe when none exist.
    pub fn unregister(&self, user_id: UserId) {
        let mut registry = self.registry.lock();
        self.teardown(&mut registry, user_id);
    }

    fn teardown(&self, registry: &mut HashMap<UserId, UserJobs>, user_id: UserId) {
        if let Some(entry) = registry.remove(&user_id) {
            for job in entry.jobs {
                if let Err(err) = self.clock.cancel(&job) {
                    warn!(user_id, job = %job, error = %err, "failed to remove trigger");
                }
            }
            debug!(user_id, "periods unregistered");
        }
    }

    /// Flips the user's notifications and returns the new state.
    ///
    /// Enabling registers the periods currently in the store. The new state is
    /// written back to the store.
    pub fn toggle(&self, user_id: UserId) -> Result<bool, SchedulerError> {
        // Registry lock held through the store write: flags persist in flip order.
        let mut registry = self.registry.lock();
        let enabled = if registry.contains_key(&user_id) {
            self.teardown(&mut registry, user_id);
            false
        } else {
            let periods = self.store.load_periods(user_id).map_err(|e| SchedulerError::Store(e.to_string()))?;
            self.register_locked(&mut registry, user_id, &periods);
            true
        };

        self.store
            .set_notifications_enabled(user_id, enabled)
            .map_err(|e| SchedulerError::Store(e.to_string()))?;
        drop(registry);
        info!(user_id, enabled, "notifications toggled");
        Ok(enabled)
    }

    /// Period containing `t`, or the next one to start, from the store.
    pub fn find_period_for_time(&self, user_id: UserId, t: NaiveTime) -> Result<Option<ProductivityPeriod>, SchedulerError> {
        let periods = self.store.load_periods(user_id).map_err(|e| SchedulerError::Store(e.to_string()))?;
        Ok(find_period_for_time(&periods, t).cloned())
    }

    pub fn is_enabled(&self, user_id: UserId) -> bool {
        self.registry.lock().contains_key(&user_id)
    }

    /// Job ids currently held for the user, in key order.
    pub fn active_jobs(&self, user_id: UserId) -> Vec<JobKey> {
        self.registry
            .lock()
            .get(&user_id)
            .map(|entry| entry.jobs.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Registers every user whose notifications are enabled in the store.
    ///
    /// Returns the number of users registered. A user whose data cannot be
    /// read is skipped.
    pub fn bootstrap(&self) -> Result<usize, SchedulerError> {
        let users = self.store.load_users().map_err(|e| SchedulerError::Store(e.to_string()))?;
        let mut registered = 0;

        for user_id in users {
            match self.store.notifications_enabled(user_id) {
                Ok(true) => match self.store.load_periods(user_id) {
                    Ok(periods) => {
                        self.register(user_id, &periods);
                        registered += 1;
                    }
                    Err(err) => warn!(user_id, error = %err, "failed to load periods"),
                },
                Ok(false) => {}
                Err(err) => warn!(user_id, error = %err, "failed to read notification flag"),
            }
        }

        Ok(registered)
    }

    /// Brings one user's jobs in line with the store.
    pub fn resync_user(&self, user_id: UserId) -> Result<SyncAction, SchedulerError> {
        let wanted = self
            .store
            .notifications_enabled(user_id)
            .map_err(|e| SchedulerError::Store(e.to_string()))?;

        if wanted != self.is_enabled(user_id) {
            return Ok(if self.toggle(user_id)? { SyncAction::Enabled } else { SyncAction::Disabled });
        }
        if !wanted {
            return Ok(SyncAction::Unchanged);
        }

        let stored = self.store.load_periods(user_id).map_err(|e| SchedulerError::Store(e.to_string()))?;
        let current = self
            .registry
            .lock()
            .get(&user_id)
            .map(|entry| entry.periods.clone())
            .unwrap_or_default();
        if stored == current {
            return Ok(SyncAction::Unchanged);
        }

        self.register(user_id, &stored);
        Ok(SyncAction::Rescheduled)
    }

    /// Resyncs every stored user and drops users no longer in the store.
    pub fn resync_all(&self) -> Result<Vec<(UserId, SyncAction)>, SchedulerError> {
        let users = self.store.load_users().map_err(|e| SchedulerError::Store(e.to_string()))?;

        let known: Vec<UserId> = self.registry.lock().keys().copied().collect();
        for user_id in known.into_iter().filter(|id| !users.contains(id)) {
            self.unregister(user_id);
        }

        let mut actions = Vec::new();
        for user_id in users {
            match self.resync_user(user_id) {
                Ok(SyncAction::Unchanged) => {}
                Ok(action) => actions.push((user_id, action)),
                Err(err) => warn!(user_id, error = %err, "resync failed"),
            }
        }
        Ok(actions)
    }

    fn reminder_callback(&self, user_id: UserId, key: JobKey, period: &ProductivityPeriod) -> JobCallback {
        let sender = Arc::clone(&self.sender);
        let text = reminder_text(period);

        Arc::new(move || -> JobFuture {
            let sender = Arc::clone(&sender);
            let text = text.clone();
            let key = key.clone();
            Box::pin(async move {
                if let Err(err) = sender.send(user_id, &text).await {
                    warn!(user_id, job = %key, error = %err, "reminder delivery failed");
                }
            })
        })
    }
}

/// Text sent when a period starts.
pub fn reminder_text(period: &ProductivityPeriod) -> String {
    Message::PeriodReminder {
        start: period.start_time.format("%H:%M").to_string(),
        end: period.end_time.format("%H:%M").to_string(),
        activity: period.recommended_activity.clone(),
    }
    .to_string()
}
