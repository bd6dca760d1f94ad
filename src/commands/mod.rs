//! Command-line interface.
//!
//! Each subcommand lives in its own module with an `Args` struct and a `cmd`
//! function; [`Cli::menu`] parses the command line and dispatches.

pub mod analyze;
pub mod init;
pub mod ingest;
pub mod notify;
pub mod now;
pub mod periods;
pub mod start;
pub mod user;
pub mod watch;

use crate::libs::prompt::Instruction;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage users and their IAF", arg_required_else_help = true)]
    User(user::UserArgs),
    #[command(about = "Validate a BCI export and store its metrics", arg_required_else_help = true)]
    Ingest(ingest::IngestArgs),
    #[command(about = "Analyze stored metrics into productivity periods")]
    Analyze(analyze::AnalyzeArgs),
    #[command(about = "Build a day plan from stored metrics")]
    Plan(analyze::AnalyzeArgs),
    #[command(about = "Suggest improvements from stored metrics")]
    Improve(analyze::AnalyzeArgs),
    #[command(about = "Show or export productivity periods")]
    Periods(periods::PeriodsArgs),
    #[command(about = "Show the period for the current or a given time")]
    Now(now::NowArgs),
    #[command(about = "Toggle period reminders")]
    Notify(notify::NotifyArgs),
    #[command(about = "Run the reminder scheduler")]
    Watch(watch::WatchArgs),
    #[command(about = "Guided session: IAF, upload, analysis")]
    Start(start::StartArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::User(args) => user::cmd(args),
            Commands::Ingest(args) => ingest::cmd(args).await,
            Commands::Analyze(args) => analyze::cmd(args, Instruction::FullAnalysis).await,
            Commands::Plan(args) => analyze::cmd(args, Instruction::DayPlan).await,
            Commands::Improve(args) => analyze::cmd(args, Instruction::Improvements).await,
            Commands::Periods(args) => periods::cmd(args),
            Commands::Now(args) => now::cmd(args),
            Commands::Notify(args) => notify::cmd(args),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Start(args) => start::cmd(args).await,
        }
    }
}
