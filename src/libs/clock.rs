//! Daily triggers.
//!
//! [`TriggerClock`] is the narrow timer interface the scheduler is written
//! against. [`TokioClock`] implements it with one tokio task per job that
//! sleeps until the next local `HH:MM` and fires, every day, until cancelled.

use crate::libs::scheduler::{JobKey, SchedulerError};
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

pub type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Invoked each time a trigger fires.
pub type JobCallback = Arc<dyn Fn() -> JobFuture + Send + Sync>;

pub trait TriggerClock: Send + Sync {
    /// Fires `callback` every day at `hour:minute` local time.
    ///
    /// With `replace_existing`, a job already registered under `job_id` is
    /// cancelled first; without it, a duplicate id is an error.
    fn schedule_daily(&self, hour: u32, minute: u32, callback: JobCallback, job_id: &JobKey, replace_existing: bool) -> Result<(), SchedulerError>;

    /// Removes a job. Unknown ids are not an error.
    fn cancel(&self, job_id: &JobKey) -> Result<(), SchedulerError>;
}

/// Time left from `now` until the next `hour:minute`.
///
/// A trigger time equal to `now` is scheduled for the following day.
pub fn until_next(now: NaiveDateTime, hour: u32, minute: u32) -> Option<ChronoDuration> {
    let at = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let today = now.date().and_time(at);
    let next = if today > now { today } else { today + ChronoDuration::days(1) };
    Some(next - now)
}

/// Timer backed by tokio tasks on the current runtime.
#[derive(Default)]
pub struct TokioClock {
    tasks: Mutex<HashMap<JobKey, JoinHandle<()>>>,
}

impl TokioClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of jobs that are still running.
    pub fn scheduled(&self) -> Vec<JobKey> {
        let mut tasks = self.tasks.lock();
        tasks.retain(|_, handle| !handle.is_finished());
        let mut keys: Vec<JobKey> = tasks.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl TriggerClock for TokioClock {
    fn schedule_daily(&self, hour: u32, minute: u32, callback: JobCallback, job_id: &JobKey, replace_existing: bool) -> Result<(), SchedulerError> {
        if NaiveTime::from_hms_opt(hour, minute, 0).is_none() {
            return Err(SchedulerError::Trigger(format!("invalid time {:02}:{:02}", hour, minute)));
        }
        let runtime = Handle::try_current().map_err(|e| SchedulerError::Trigger(e.to_string()))?;

        let mut tasks = self.tasks.lock();
        if let Some(previous) = tasks.remove(job_id) {
            if !replace_existing && !previous.is_finished() {
                tasks.insert(job_id.clone(), previous);
                return Err(SchedulerError::Trigger(format!("job {} already exists", job_id)));
            }
            previous.abort();
        }

        let key = job_id.clone();
        let handle = runtime.spawn(async move {
            loop {
                let wait = until_next(Local::now().naive_local(), hour, minute)
                    .and_then(|d| d.to_std().ok())
                    .unwrap_or(Duration::from_secs(60));
                tokio::time::sleep(wait).await;
                debug!(job = %key, "trigger fired");
                callback().await;
            }
        });
        tasks.insert(job_id.clone(), handle);
        Ok(())
    }

    fn cancel(&self, job_id: &JobKey) -> Result<(), SchedulerError> {
        if let Some(handle) = self.tasks.lock().remove(job_id) {
            handle.abort();
        }
        Ok(())
    }
}

impl Drop for TokioClock {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.lock().drain() {
            handle.abort();
        }
    }
}
