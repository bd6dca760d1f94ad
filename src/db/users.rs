use crate::db::db::Db;
use crate::libs::messages::Message;
use crate::libs::period::UserId;
use crate::libs::user::User;
use crate::msg_error_anyhow;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "SELECT id, telegram_id, name, iaf, notifications_enabled, created_at FROM users";
const INSERT_USER: &str = "INSERT INTO users (telegram_id, name) VALUES (?1, ?2)";
const UPDATE_IAF: &str = "UPDATE users SET iaf = ?2 WHERE id = ?1";
const UPDATE_NAME: &str = "UPDATE users SET name = ?2 WHERE id = ?1";

pub struct Users {
    conn: Connection,
}

impl Users {
    pub fn new() -> Result<Self> {
        Ok(Self::with_db(Db::new()?))
    }

    pub fn with_db(db: Db) -> Self {
        Self { conn: db.conn }
    }

    /// Returns the user with `telegram_id`, creating it when missing.
    ///
    /// Without a telegram id a new local user is always created. A known
    /// user gets its name refreshed when a non-empty one is given.
    pub fn get_or_create(&mut self, telegram_id: Option<i64>, name: &str) -> Result<User> {
        if let Some(tg_id) = telegram_id {
            if let Some(user) = self.find_by_telegram_id(tg_id)? {
                if !name.trim().is_empty() && user.name != name {
                    self.conn.execute(UPDATE_NAME, params![user.id, name])?;
                    return self.get(user.id);
                }
                return Ok(user);
            }
        }

        self.conn.execute(INSERT_USER, params![telegram_id, name])?;
        self.get(self.conn.last_insert_rowid())
    }

    pub fn get(&self, id: UserId) -> Result<User> {
        self.find(id)?.ok_or_else(|| msg_error_anyhow!(Message::UserNotFound(id)))
    }

    pub fn find(&self, id: UserId) -> Result<Option<User>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        Ok(self.conn.query_row(&sql, params![id], user_from_row).optional()?)
    }

    pub fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        let sql = format!("{} WHERE telegram_id = ?1", SELECT_COLUMNS);
        Ok(self.conn.query_row(&sql, params![telegram_id], user_from_row).optional()?)
    }

    /// Stores an already validated IAF value.
    pub fn set_iaf(&mut self, id: UserId, iaf: f64) -> Result<()> {
        let affected = self.conn.execute(UPDATE_IAF, params![id, iaf])?;
        if affected == 0 {
            return Err(msg_error_anyhow!(Message::UserNotFound(id)));
        }
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<User>> {
        let sql = format!("{} ORDER BY id", SELECT_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let users = stmt.query_map([], user_from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }
}

pub(crate) fn user_from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        telegram_id: row.get(1)?,
        name: row.get(2)?,
        iaf: row.get(3)?,
        notifications_enabled: row.get(4)?,
        created_at: row.get(5)?,
    })
}
