//! SQLite persistence.
//!
//! Every repository wraps its own connection opened through [`db::Db`], which
//! applies pending migrations on open. Repositories offer `new()` for the
//! database in the data directory and `with_db()` for an explicit one.

/// Connection setup and the database file location.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Metric rows stored per ingestion batch.
pub mod metrics;

/// Productivity periods and notification flags, shared with the scheduler.
pub mod periods;

/// Day plans and improvement suggestions.
pub mod recommendations;

/// Users and their IAF.
pub mod users;
