#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleLlm,
    ConfigModuleTelegram,
    ConfigModuleScheduler,
    ConfigModuleIngest,

    // === PROMPTS ===
    PromptSelectModules,
    PromptLlmProvider,
    PromptLlmApiKey,
    PromptLlmModel,
    PromptLlmMaxTokens,
    PromptLlmTemperature,
    PromptLlmTimeout,
    PromptBotToken,
    PromptResyncInterval,
    PromptDisplayUtc,
    PromptMaxFileSize,
    PromptUserName,
    PromptIaf,
    PromptFilePath,
    PromptRetryUpload,
    PromptEnableNotifications,

    // === USER MESSAGES ===
    UserReady(i64, String), // id, name
    UserNotFound(i64),
    NoUsersFound,
    IafSaved(f64),
    IafInvalid(String),

    // === INGEST MESSAGES ===
    IngestRejected { reason: String, action: String },
    MetricsSaved(usize),
    NoMetricsFound(i64),

    // === ANALYSIS MESSAGES ===
    UsingMockAnalyzer,
    AnalysisStarted(usize), // rows
    AnalysisFailed(String),
    AnalysisEmpty,
    AnalysisPreviewHeader,
    PeriodsSaved(usize),
    DayPlanSaved,
    SuggestionsSaved(usize),

    // === PERIOD MESSAGES ===
    NoPeriodsFound,
    CurrentPeriod(String, String), // time, period
    NextPeriod(String, String),    // time, period
    NoPeriodAt(String),
    InvalidTimeFormat(String),
    ExportCompleted(String),
    RunAnalysisFirst(i64),

    // === NOTIFICATION MESSAGES ===
    NotificationsEnabled(usize),
    NotificationsEnabledNoPeriods,
    NotificationsDisabled,
    PeriodReminder { start: String, end: String, activity: String },
    ConsoleReminder(i64, String),
    UserHasNoChat(i64),
    TelegramSendFailed(u16, String),
    TelegramNotConfigured,

    // === SESSION MESSAGES ===
    SessionWelcome(String),
    SessionFinished,
    SessionAborted,

    // === WATCHER MESSAGES ===
    WatcherStarted(u32),
    WatcherStartedUsers(usize),
    WatcherStopped(u32),
    WatcherNotRunning,
    WatcherStoppingExisting(String),
    WatcherFailedToStopExisting(String),
    WatcherFailedToStop(u32),
    WatcherReceivedSigterm,
    WatcherReceivedSigint,
    WatcherReceivedCtrlC,
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    WatcherShuttingDown,
    WatcherExited,
    WatcherError(String),
    WatcherTaskPanicked(String),
    WatcherHint,
    InvalidPidFileContent,
    DaemonModeNotSupported,
    ProcessTerminationNotSupported,
    FailedToOpenProcess(u32),
    FailedToTerminateProcess(u32),

    // === DATABASE MESSAGES ===
    DatabaseUpToDate,
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
}
