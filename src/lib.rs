//! # brainclock
//!
//! Turns BCI/EEG headset exports into daily productivity periods and reminds
//! the user when each period starts.
//!
//! ## Features
//!
//! - **Ingestion**: CSV/XLSX validation with header normalization and
//!   numeric coercion
//! - **Analysis**: language model prompts over the stored metrics, with
//!   recovery of the JSON answer
//! - **Scheduling**: one daily reminder per period, kept in sync with the
//!   database by the `watch` daemon
//!
//! ## Usage
//!
//! ```rust,no_run
//! use brainclock::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
