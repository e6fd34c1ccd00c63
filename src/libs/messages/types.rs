#[derive(Debug, Clone)]
pub enum Message {
    // === TRACKING MESSAGES ===
    TrackingStarted(String), // time
    TrackingStopped(String), // time
    TrackingStatus {
        status: String,
        elapsed: String,
        active: String,
    },
    SessionEventReceived(String), // event
    SessionEnding,

    // === BREAK MESSAGES ===
    BreakStarted(String), // label
    BreakEnded {
        label: String,
        duration: String,
    },
    BreakReasonRequested(String), // duration
    BreakReasonApplied(String),   // reason
    BreakReasonDropped(u64),      // break id
    BreakPromptUnavailable(String),
    BreakPromptFailed(String),
    BreakReasonsPending(usize),
    ManualBreakAdded {
        start: String,
        end: String,
        kind: String,
    },
    ManualBreakRejected {
        start: String,
        end: String,
        kind: String,
    },

    // === PROMPT MESSAGES ===
    PromptBreakReason {
        start: String,
        end: String,
        duration: String,
    },
    PromptBreakReasonOther,
    BreakReasonOther,

    // === CHECKPOINT / STORAGE MESSAGES ===
    CheckpointSaved(String),  // date
    CheckpointFailed(String), // error
    LoadAllFailed(String),    // error
    LoadDayFailed(String, String), // date, error
    StoredDaySkipped(String),      // error
    StoredBreakInvalid(String, String), // date, error

    // === DAY VIEW MESSAGES ===
    DaysTitle(usize), // count
    DayTitle(String), // date
    NoStoredDays,
    WorkdayNotFoundForDate(String),
    InvalidDate(String),

    // === WATCHER MESSAGES ===
    WatcherStartingForeground,
    WatcherReceivedSignal(String), // signal name
    WatcherCtrlCListenFailed(String),
    WatcherSignalHandlingNotSupported,
    EventFeedClosed,
    EventFeedFailed(String),
    InvalidSessionEvent(String),
    InboxClosed,
    MonitorShuttingDown,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleTracker,
    PromptLongBreakThreshold,
    PromptTickInterval,
    PromptBreakReasons,
    PromptAutoStart,

    // === STATUS LABELS ===
    StatusIdle,
    StatusRunning,
    StatusOnBreak,
    StatusStopped,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
    DatabaseUpToDate,
}
