//! Text of every [`Message`].
//!
//! All user-facing wording lives here; call sites only pick a variant and
//! its parameters.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration file deleted".to_string(),
            Message::ConfigNotFound => "No configuration file to delete".to_string(),
            Message::ConfigModuleLlm => "Language model settings:".to_string(),
            Message::ConfigModuleTelegram => "Telegram settings:".to_string(),
            Message::ConfigModuleScheduler => "Scheduler settings:".to_string(),
            Message::ConfigModuleIngest => "Upload settings:".to_string(),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptLlmProvider => "Provider".to_string(),
            Message::PromptLlmApiKey => "API key (empty to use environment variables)".to_string(),
            Message::PromptLlmModel => "Model".to_string(),
            Message::PromptLlmMaxTokens => "Max tokens".to_string(),
            Message::PromptLlmTemperature => "Temperature".to_string(),
            Message::PromptLlmTimeout => "Request timeout, seconds".to_string(),
            Message::PromptBotToken => "Bot token".to_string(),
            Message::PromptResyncInterval => "Resync interval, seconds".to_string(),
            Message::PromptDisplayUtc => "Show times in UTC in prompts".to_string(),
            Message::PromptMaxFileSize => "Maximum upload size, MB".to_string(),
            Message::PromptUserName => "Your name".to_string(),
            Message::PromptIaf => "Individual alpha frequency in Hz, 7-14 (empty to skip)".to_string(),
            Message::PromptFilePath => "Path to the CSV or XLSX export".to_string(),
            Message::PromptRetryUpload => "Try another file?".to_string(),
            Message::PromptEnableNotifications => "Enable reminders for your productivity periods?".to_string(),

            // === USER MESSAGES ===
            Message::UserReady(id, name) => format!("User {} ({}) is ready", id, name),
            Message::UserNotFound(id) => format!("User {} not found", id),
            Message::NoUsersFound => "No users yet. Add one with `brainclock user add <name>`".to_string(),
            Message::IafSaved(iaf) => format!("IAF saved: {:.1} Hz", iaf),
            Message::IafInvalid(reason) => format!("Invalid IAF: {}", reason),

            // === INGEST MESSAGES ===
            Message::IngestRejected { reason, action } => format!("File rejected: {}. {}", reason, action),
            Message::MetricsSaved(count) => format!("Stored {} metric rows", count),
            Message::NoMetricsFound(id) => format!("No metrics stored for user {}. Run `brainclock ingest` first", id),

            // === ANALYSIS MESSAGES ===
            Message::UsingMockAnalyzer => "No API key configured, using the built-in sample analysis".to_string(),
            Message::AnalysisStarted(rows) => format!("Analyzing {} rows...", rows),
            Message::AnalysisFailed(error) => format!("Analysis failed: {}", error),
            Message::AnalysisEmpty => "The analysis came back empty, nothing was stored".to_string(),
            Message::AnalysisPreviewHeader => "Analysis results:".to_string(),
            Message::PeriodsSaved(count) => format!("Saved {} productivity periods", count),
            Message::DayPlanSaved => "Day plan saved".to_string(),
            Message::SuggestionsSaved(count) => format!("Saved {} improvement suggestions", count),

            // === PERIOD MESSAGES ===
            Message::NoPeriodsFound => "No productivity periods found".to_string(),
            Message::CurrentPeriod(time, period) => format!("At {} you are in {}", time, period),
            Message::NextPeriod(time, period) => format!("Nothing scheduled at {}. Next up: {}", time, period),
            Message::NoPeriodAt(time) => format!("No more periods after {} today", time),
            Message::InvalidTimeFormat(raw) => format!("Invalid time '{}', expected HH:MM", raw),
            Message::ExportCompleted(path) => format!("Export completed: {}", path),
            Message::RunAnalysisFirst(id) => format!("User {} has no periods yet. Run `brainclock analyze --user {}`", id, id),

            // === NOTIFICATION MESSAGES ===
            Message::NotificationsEnabled(jobs) => format!("Reminders enabled ({} daily)", jobs),
            Message::NotificationsEnabledNoPeriods => "Reminders enabled, but there are no periods to remind about".to_string(),
            Message::NotificationsDisabled => "Reminders disabled".to_string(),
            Message::PeriodReminder { start, end, activity } => format!("⏰ {}–{}: {}", start, end, activity),
            Message::ConsoleReminder(user_id, text) => format!("[user {}] {}", user_id, text),
            Message::UserHasNoChat(id) => format!("User {} has no Telegram chat linked", id),
            Message::TelegramSendFailed(status, body) => format!("Telegram API error (status {}): {}", status, body),
            Message::TelegramNotConfigured => "No bot token configured, reminders will be printed to the console".to_string(),

            // === SESSION MESSAGES ===
            Message::SessionWelcome(name) => format!(
                "Hi, {}! Let's find your most productive hours. You'll need your IAF and a CSV or XLSX export from your BCI device.",
                name
            ),
            Message::SessionFinished => "All set. Run `brainclock now` any time to see what fits the moment.".to_string(),
            Message::SessionAborted => "Session cancelled".to_string(),

            // === WATCHER MESSAGES ===
            Message::WatcherStarted(pid) => format!("Watcher started in background (PID: {})", pid),
            Message::WatcherStartedUsers(count) => format!("Watcher running, reminders active for {} users", count),
            Message::WatcherStopped(pid) => format!("Watcher stopped (PID: {})", pid),
            Message::WatcherNotRunning => "Watcher is not running".to_string(),
            Message::WatcherStoppingExisting(pid) => format!("Stopping existing watcher (PID: {})", pid),
            Message::WatcherFailedToStopExisting(error) => format!("Failed to stop existing watcher: {}", error),
            Message::WatcherFailedToStop(pid) => format!("Failed to stop watcher (PID: {})", pid),
            Message::WatcherReceivedSigterm => "Received SIGTERM".to_string(),
            Message::WatcherReceivedSigint => "Received SIGINT".to_string(),
            Message::WatcherReceivedCtrlC => "Received Ctrl-C".to_string(),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl-C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::WatcherShuttingDown => "Shutting down watcher".to_string(),
            Message::WatcherExited => "Watcher exited".to_string(),
            Message::WatcherError(error) => format!("Watcher error: {}", error),
            Message::WatcherTaskPanicked(error) => format!("Watcher task panicked: {}", error),
            Message::WatcherHint => "Reminders fire while `brainclock watch` is running".to_string(),
            Message::InvalidPidFileContent => "Invalid PID file content".to_string(),
            Message::DaemonModeNotSupported => "Background mode is not supported on this platform".to_string(),
            Message::ProcessTerminationNotSupported => "Process termination is not supported on this platform".to_string(),
            Message::FailedToOpenProcess(code) => format!("Failed to open process (error {})", code),
            Message::FailedToTerminateProcess(code) => format!("Failed to terminate process (error {})", code),

            // === DATABASE MESSAGES ===
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::MigrationsFound(count) => format!("Found {} pending migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
        };
        write!(f, "{}", s)
    }
}
