//! SQLite-backed period store.
//!
//! [`SqliteStore`] is the persistence side of the scheduler: periods are
//! replaced wholesale per user, and the notification flag lives on the user
//! row. The connection sits behind a mutex so one store can be shared between
//! the scheduler, its trigger callbacks and the resync loop.

use crate::db::db::Db;
use crate::libs::notify::ChatDirectory;
use crate::libs::period::{parse_period_time, PeriodStore, ProductivityPeriod, UserId};
use anyhow::Result;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

const SELECT_PERIODS: &str = "SELECT start_time, end_time, productivity_score, recommended_activity
    FROM productivity_periods WHERE user_id = ?1 ORDER BY start_time, id";
const DELETE_PERIODS: &str = "DELETE FROM productivity_periods WHERE user_id = ?1";
const INSERT_PERIOD: &str = "INSERT INTO productivity_periods
    (user_id, start_time, end_time, productivity_score, recommended_activity) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_USER_IDS: &str = "SELECT id FROM users ORDER BY id";
const SELECT_NOTIFICATIONS: &str = "SELECT notifications_enabled FROM users WHERE id = ?1";
const UPDATE_NOTIFICATIONS: &str = "UPDATE users SET notifications_enabled = ?2 WHERE id = ?1";
const SELECT_TELEGRAM_ID: &str = "SELECT telegram_id FROM users WHERE id = ?1";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: Mutex::new(db.conn) }
    }
}

impl PeriodStore for SqliteStore {
    fn load_periods(&self, user_id: UserId) -> Result<Vec<ProductivityPeriod>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_PERIODS)?;
        let raw = stmt
            .query_map(params![user_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<f64>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut periods = Vec::with_capacity(raw.len());
        for (start, end, score, activity) in raw {
            match (parse_period_time(&start), parse_period_time(&end)) {
                (Some(start_time), Some(end_time)) => periods.push(ProductivityPeriod {
                    start_time,
                    end_time,
                    recommended_activity: activity.unwrap_or_default(),
                    productivity_score: score.unwrap_or(0.0),
                }),
                _ => warn!(user_id, start = %start, end = %end, "skipping stored period with bad times"),
            }
        }
        Ok(periods)
    }

    fn save_periods(&self, user_id: UserId, periods: &[ProductivityPeriod]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(DELETE_PERIODS, params![user_id])?;
        {
            let mut stmt = tx.prepare(INSERT_PERIOD)?;
            for period in periods {
                stmt.execute(params![
                    user_id,
                    period.start_time.format("%H:%M").to_string(),
                    period.end_time.format("%H:%M").to_string(),
                    period.productivity_score,
                    period.recommended_activity,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_users(&self) -> Result<Vec<UserId>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_USER_IDS)?;
        let ids = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<UserId>, _>>()?;
        Ok(ids)
    }

    fn notifications_enabled(&self, user_id: UserId) -> Result<bool> {
        let conn = self.conn.lock();
        let enabled: Option<bool> = conn
            .query_row(SELECT_NOTIFICATIONS, params![user_id], |row| row.get(0))
            .optional()?;
        Ok(enabled.unwrap_or(false))
    }

    fn set_notifications_enabled(&self, user_id: UserId, enabled: bool) -> Result<()> {
        self.conn.lock().execute(UPDATE_NOTIFICATIONS, params![user_id, enabled])?;
        Ok(())
    }
}

impl ChatDirectory for SqliteStore {
    fn chat_id(&self, user_id: UserId) -> Result<Option<i64>> {
        let conn = self.conn.lock();
        let chat: Option<Option<i64>> = conn
            .query_row(SELECT_TELEGRAM_ID, params![user_id], |row| row.get(0))
            .optional()?;
        Ok(chat.flatten())
    }
}
