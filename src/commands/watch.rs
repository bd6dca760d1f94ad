use crate::libs::daemon;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Detach and run in the background
    #[arg(short, long, conflicts_with = "stop")]
    background: bool,

    /// Stop a background watcher
    #[arg(short, long)]
    stop: bool,

    /// Set on the detached child process
    #[arg(long = "daemon-run", hide = true)]
    daemon_run: bool,
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    if args.stop {
        return daemon::stop();
    }
    if args.background && !args.daemon_run {
        return daemon::spawn();
    }
    daemon::run_with_signal_handling().await
}
