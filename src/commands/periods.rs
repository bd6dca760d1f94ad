use crate::{
    db::{periods::SqliteStore, users::Users},
    libs::{
        export::{ExportFormat, Exporter},
        messages::Message,
        period::{PeriodStore, UserId},
        view::View,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PeriodsArgs {
    #[arg(short, long)]
    user: UserId,

    /// Write the periods to a file instead of printing them
    #[arg(short, long, value_enum)]
    export: Option<ExportFormat>,

    /// Output file; defaults to a timestamped name in the working directory
    #[arg(short, long, requires = "export")]
    output: Option<PathBuf>,
}

pub fn cmd(args: PeriodsArgs) -> Result<()> {
    let user = Users::new()?.get(args.user)?;
    let periods = SqliteStore::new()?.load_periods(user.id)?;

    if periods.is_empty() {
        msg_info!(Message::NoPeriodsFound);
        return Ok(());
    }

    match args.export {
        Some(format) => {
            let path = Exporter::new(format, args.output).export_periods(&periods)?;
            msg_success!(Message::ExportCompleted(path.display().to_string()));
        }
        None => View::periods(&periods)?,
    }
    Ok(())
}
