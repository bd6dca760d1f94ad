use crate::db::db::Db;
use crate::libs::metrics::MetricSample;
use crate::libs::period::UserId;
use anyhow::Result;
use rusqlite::{params, Connection, Row};

const INSERT_METRIC: &str = "INSERT INTO metrics (
    user_id, batch_id, timestamp, cognitive_score, focus, chill, stress, self_control, anger,
    relaxation_index, concentration_index, fatique_score, reverse_fatique, alpha_gravity, heart_rate
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)";
const SELECT_NEXT_BATCH: &str = "SELECT COALESCE(MAX(batch_id), 0) + 1 FROM metrics WHERE user_id = ?1";
// Newest rows first in the subquery, then ascending for the caller.
const SELECT_LATEST: &str = "SELECT * FROM (
    SELECT timestamp, cognitive_score, focus, chill, stress, self_control, anger,
           relaxation_index, concentration_index, fatique_score, reverse_fatique, alpha_gravity, heart_rate, id
    FROM metrics WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC LIMIT ?2
) ORDER BY timestamp ASC, id ASC";
const COUNT_METRICS: &str = "SELECT COUNT(*) FROM metrics WHERE user_id = ?1";

pub struct Metrics {
    conn: Connection,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    /// Stores one ingestion batch and returns the number of rows written.
    pub fn save_bulk(&mut self, user_id: UserId, rows: &[MetricSample]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let batch_id: i64 = tx.query_row(SELECT_NEXT_BATCH, params![user_id], |row| row.get(0))?;
        {
            let mut stmt = tx.prepare(INSERT_METRIC)?;
            for m in rows {
                stmt.execute(params![
                    user_id,
                    batch_id,
                    m.timestamp,
                    m.cognitive_score,
                    m.focus,
                    m.chill,
                    m.stress,
                    m.self_control,
                    m.anger,
                    m.relaxation_index,
                    m.concentration_index,
                    m.fatique_score,
                    m.reverse_fatique,
                    m.alpha_gravity,
                    m.heart_rate,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// The `limit` most recent rows, ordered by timestamp ascending.
    pub fn load(&self, user_id: UserId, limit: usize) -> Result<Vec<MetricSample>> {
        let mut stmt = self.conn.prepare(SELECT_LATEST)?;
        let rows = stmt
            .query_map(params![user_id, limit as i64], sample_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count(&self, user_id: UserId) -> Result<usize> {
        let count: i64 = self.conn.query_row(COUNT_METRICS, params![user_id], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn sample_from_row(row: &Row) -> rusqlite::Result<MetricSample> {
    Ok(MetricSample {
        timestamp: row.get(0)?,
        cognitive_score: row.get(1)?,
        focus: row.get(2)?,
        chill: row.get(3)?,
        stress: row.get(4)?,
        self_control: row.get(5)?,
        anger: row.get(6)?,
        relaxation_index: row.get(7)?,
        concentration_index: row.get(8)?,
        fatique_score: row.get(9)?,
        reverse_fatique: row.get(10)?,
        alpha_gravity: row.get(11)?,
        heart_rate: row.get(12)?,
    })
}
