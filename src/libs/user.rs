use crate::libs::period::UserId;
use chrono::NaiveDateTime;
use thiserror::Error;

pub const IAF_MIN: f64 = 7.0;
pub const IAF_MAX: f64 = 14.0;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub telegram_id: Option<i64>,
    pub name: String,
    /// Individual alpha frequency in Hz.
    pub iaf: Option<f64>,
    pub notifications_enabled: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IafError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{0} Hz is outside the 7-14 Hz range")]
    OutOfRange(f64),
}

/// Parses an IAF value in Hz. A comma works as decimal separator.
pub fn parse_iaf(input: &str) -> Result<f64, IafError> {
    let value: f64 = input
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| IafError::NotANumber(input.trim().to_string()))?;

    if !value.is_finite() || !(IAF_MIN..=IAF_MAX).contains(&value) {
        return Err(IafError::OutOfRange(value));
    }
    Ok(value)
}
