//! The `watch` daemon: keeps reminder jobs in sync with the database.
//!
//! On start every user with notifications enabled is registered with the
//! scheduler. After that the store is reconciled on a fixed interval, so
//! periods saved by `analyze` or flags flipped by `notify` in another process
//! are picked up without a restart.
//!
//! The daemon runs in the foreground until SIGINT/SIGTERM (Ctrl-C on
//! Windows), or detached with its PID recorded in the data directory.

use crate::db::periods::SqliteStore;
use crate::libs::clock::TokioClock;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::notify::{ConsoleSender, NotificationSender, TelegramSender};
use crate::libs::scheduler::Scheduler;
use crate::{msg_bail_anyhow, msg_error, msg_error_anyhow, msg_info, msg_warning};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const PID_FILE: &str = "brainclock-watch.pid";

/// Hidden argument the detached child is started with.
pub const DAEMON_RUN_ARG: &str = "--daemon-run";

pub async fn run_with_signal_handling() -> Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            tokio::select! {
                _ = sigterm.recv() => msg_info!(Message::WatcherReceivedSigterm),
                _ = sigint.recv() => msg_info!(Message::WatcherReceivedSigint),
            }
            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => msg_info!(Message::WatcherReceivedCtrlC),
                Err(e) => msg_error!(Message::WatcherCtrlCListenFailed(e.to_string())),
            }
            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(any(unix, windows)))]
    {
        drop(shutdown_tx);
        msg_warning!(Message::WatcherSignalHandlingNotSupported);
    }

    let watcher = tokio::spawn(run_scheduler());

    tokio::select! {
        result = watcher => {
            match result {
                Ok(Ok(())) => msg_info!(Message::WatcherExited),
                Ok(Err(e)) => msg_error!(Message::WatcherError(e.to_string())),
                Err(e) => msg_error!(Message::WatcherTaskPanicked(e.to_string())),
            }
        }
        _ = shutdown_rx => {
            msg_info!(Message::WatcherShuttingDown);
        }
    }

    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if pid_path.exists() {
        let _ = std::fs::remove_file(&pid_path);
    }

    Ok(())
}

/// Picks the Telegram sender when a bot token is configured.
pub fn build_sender(config: &Config, store: Arc<SqliteStore>) -> Result<Arc<dyn NotificationSender>> {
    match config.bot_token() {
        Some(token) => Ok(Arc::new(TelegramSender::new(token, store)?)),
        None => {
            msg_warning!(Message::TelegramNotConfigured);
            Ok(Arc::new(ConsoleSender))
        }
    }
}

async fn run_scheduler() -> Result<()> {
    let config = Config::read()?;
    let settings = config.scheduler_settings();

    let store = Arc::new(SqliteStore::new()?);
    let sender = build_sender(&config, Arc::clone(&store))?;
    let scheduler = Scheduler::new(Arc::new(TokioClock::new()), store, sender);

    let registered = scheduler.bootstrap()?;
    msg_info!(Message::WatcherStartedUsers(registered));

    let mut ticker = tokio::time::interval(Duration::from_secs(settings.resync_interval_secs.max(1)));
    // The first tick completes immediately; bootstrap already covered it.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match scheduler.resync_all() {
            Ok(actions) => {
                for (user_id, action) in actions {
                    info!(user_id, ?action, "user resynced");
                }
            }
            Err(err) => warn!(error = %err, "resync failed"),
        }
    }
}

pub fn spawn() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;

    if pid_path.exists() {
        if let Ok(pid_str) = std::fs::read_to_string(&pid_path) {
            msg_info!(Message::WatcherStoppingExisting(pid_str.trim().to_string()));
            if let Err(e) = stop_internal() {
                msg_warning!(Message::WatcherFailedToStopExisting(e.to_string()));
                let _ = std::fs::remove_file(&pid_path);
            }
            std::thread::sleep(Duration::from_millis(1000));
        }
    }

    let current_exe = std::env::current_exe()?;

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let mut command = std::process::Command::new(current_exe);
        command.arg("watch").arg(DAEMON_RUN_ARG);
        // SAFETY: setsid is async-signal-safe and touches no shared state.
        unsafe {
            command.pre_exec(|| {
                nix::unistd::setsid()?;
                Ok(())
            });
        }
        let child = command.spawn()?;
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::WatcherStarted(pid));
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        let child = std::process::Command::new(current_exe)
            .arg("watch")
            .arg(DAEMON_RUN_ARG)
            .creation_flags(CREATE_NO_WINDOW)
            .spawn()?;
        let pid = child.id();
        std::fs::write(pid_path, pid.to_string())?;
        msg_info!(Message::WatcherStarted(pid));
    }

    #[cfg(not(any(unix, windows)))]
    {
        let _ = current_exe;
        msg_bail_anyhow!(Message::DaemonModeNotSupported);
    }

    #[allow(unreachable_code)]
    Ok(())
}

pub fn stop() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if !pid_path.exists() {
        msg_info!(Message::WatcherNotRunning);
        return Ok(());
    }
    stop_internal()
}

fn stop_internal() -> Result<()> {
    let pid_path = DataStorage::new().get_path(PID_FILE)?;
    if !pid_path.exists() {
        msg_bail_anyhow!(Message::WatcherNotRunning);
    }

    let pid_str = std::fs::read_to_string(&pid_path)?;
    let pid: u32 = pid_str.trim().parse().map_err(|_| msg_error_anyhow!(Message::InvalidPidFileContent))?;

    let killed = kill_process(pid)?;
    std::fs::remove_file(pid_path)?;

    if killed {
        msg_info!(Message::WatcherStopped(pid));
        Ok(())
    } else {
        msg_bail_anyhow!(Message::WatcherFailedToStop(pid));
    }
}

#[cfg(windows)]
fn kill_process(pid: u32) -> Result<bool> {
    use winapi::um::errhandlingapi::GetLastError;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::{OpenProcess, TerminateProcess};
    use winapi::um::winnt::PROCESS_TERMINATE;

    unsafe {
        let handle = OpenProcess(PROCESS_TERMINATE, 0, pid);
        if handle.is_null() {
            let error = GetLastError();
            // ERROR_INVALID_PARAMETER: no such process.
            if error == 87 {
                return Ok(false);
            }
            msg_bail_anyhow!(Message::FailedToOpenProcess(error));
        }

        let result = TerminateProcess(handle, 0);
        CloseHandle(handle);

        if result == 0 {
            let error = GetLastError();
            msg_bail_anyhow!(Message::FailedToTerminateProcess(error));
        }
        std::thread::sleep(Duration::from_millis(100));
        Ok(true)
    }
}

#[cfg(unix)]
fn kill_process(pid: u32) -> Result<bool> {
    use std::process::Command;

    let output = Command::new("ps").arg("-p").arg(pid.to_string()).output()?;
    if !output.status.success() {
        return Ok(false);
    }

    Command::new("kill").arg("-TERM").arg(pid.to_string()).output()?;

    for _ in 0..10 {
        std::thread::sleep(Duration::from_millis(100));
        let check = Command::new("ps").arg("-p").arg(pid.to_string()).output()?;
        if !check.status.success() {
            return Ok(true);
        }
    }

    Command::new("kill").arg("-9").arg(pid.to_string()).output()?;
    std::thread::sleep(Duration::from_millis(100));
    Ok(true)
}

#[cfg(not(any(unix, windows)))]
fn kill_process(_pid: u32) -> Result<bool> {
    msg_bail_anyhow!(Message::ProcessTerminationNotSupported);
}
