use super::period::ProductivityPeriod;
use super::user::User;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn periods(periods: &[ProductivityPeriod]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "START", "END", "SCORE", "ACTIVITY"]);
        for (i, period) in periods.iter().enumerate() {
            table.add_row(row![
                i + 1,
                period.start_time.format("%H:%M"),
                period.end_time.format("%H:%M"),
                format!("{:.2}", period.productivity_score),
                period.recommended_activity
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn users(users: &[User]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "NAME", "TELEGRAM", "IAF", "NOTIFICATIONS", "CREATED"]);
        for user in users {
            table.add_row(row![
                user.id,
                user.name,
                user.telegram_id.map(|id| id.to_string()).unwrap_or_default(),
                user.iaf.map(|iaf| format!("{:.1}", iaf)).unwrap_or_default(),
                if user.notifications_enabled { "on" } else { "off" },
                user.created_at.format("%Y-%m-%d %H:%M")
            ]);
        }
        table.printstd();

        Ok(())
    }
}
