use crate::db::db::Db;
use crate::libs::period::UserId;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};

const INSERT_DAY_PLAN: &str = "INSERT INTO daily_recommendations (user_id, date, recommendation_text) VALUES (?1, ?2, ?3)";
const SELECT_LATEST_DAY_PLAN: &str = "SELECT date, recommendation_text FROM daily_recommendations
    WHERE user_id = ?1 ORDER BY id DESC LIMIT 1";
const INSERT_SUGGESTION: &str = "INSERT INTO improvement_suggestions (user_id, suggestion_text) VALUES (?1, ?2)";
const SELECT_SUGGESTIONS: &str = "SELECT suggestion_text FROM improvement_suggestions
    WHERE user_id = ?1 ORDER BY id DESC LIMIT ?2";

/// Day plans and improvement suggestions produced by analyses.
pub struct Recommendations {
    conn: Connection,
}

impl Recommendations {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    /// Stores a day plan dated today and returns its id.
    pub fn save_day_plan(&mut self, user_id: UserId, text: &str) -> Result<i64> {
        self.conn.execute(INSERT_DAY_PLAN, params![user_id, Local::now().date_naive(), text])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn latest_day_plan(&self, user_id: UserId) -> Result<Option<(Option<NaiveDate>, String)>> {
        Ok(self
            .conn
            .query_row(SELECT_LATEST_DAY_PLAN, params![user_id], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?)
    }

    pub fn save_suggestions(&mut self, user_id: UserId, suggestions: &[String]) -> Result<usize> {
        if suggestions.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_SUGGESTION)?;
            for suggestion in suggestions {
                stmt.execute(params![user_id, suggestion])?;
            }
        }
        tx.commit()?;
        Ok(suggestions.len())
    }

    /// Most recent suggestions, oldest first.
    pub fn latest_suggestions(&self, user_id: UserId, limit: usize) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(SELECT_SUGGESTIONS)?;
        let mut suggestions = stmt
            .query_map(params![user_id, limit as i64], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        suggestions.reverse();
        Ok(suggestions)
    }
}
