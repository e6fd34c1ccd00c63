//! Display implementation for timerec messages.
//!
//! Every user-facing string lives here, so the tracker, the storage layer and
//! the commands only ever deal with typed `Message` values. The text of a
//! message can change without touching the code that emits it.
//!
//! ## Usage
//!
//! ```rust
//! use timerec::{msg_info, msg_warning};
//! use timerec::libs::messages::Message;
//!
//! msg_info!(Message::BreakStarted("Lock".to_string()));
//! msg_warning!(Message::CheckpointFailed("disk full".to_string()));
//! ```

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // === TRACKING MESSAGES ===
            Message::TrackingStarted(time) => format!("Tracking started at {}", time),
            Message::TrackingStopped(time) => format!("Tracking stopped at {}", time),
            Message::TrackingStatus { status, elapsed, active } => format!("{} {} (active {})", status, elapsed, active),
            Message::SessionEventReceived(event) => format!("Session event: {}", event),
            Message::SessionEnding => "Session is ending, saving the workday...".to_string(),

            // === BREAK MESSAGES ===
            Message::BreakStarted(label) => format!("Break started ({})", label),
            Message::BreakEnded { label, duration } => format!("Break ended ({}) after {}", label, duration),
            Message::BreakReasonRequested(duration) => format!("Break of {} is longer than the threshold, asking for a reason", duration),
            Message::BreakReasonApplied(reason) => format!("Break reason set to '{}'", reason),
            Message::BreakReasonDropped(id) => format!("Break #{} no longer exists, reason dropped", id),
            Message::BreakPromptUnavailable(error) => format!("Break prompt unavailable, using the default reason: {}", error),
            Message::BreakPromptFailed(error) => format!("Break prompt failed: {}", error),
            Message::BreakReasonsPending(count) => format!("{} break reason(s) still waiting for an answer", count),
            Message::ManualBreakAdded { start, end, kind } => format!("Break {} - {} added as '{}'", start, end, kind),
            Message::ManualBreakRejected { start, end, kind } => format!("Break '{}' ignored: it ends at {} before it starts at {}", kind, end, start),

            // === PROMPT MESSAGES ===
            Message::PromptBreakReason { start, end, duration } => {
                format!("You were away from {} to {} ({}). What was the break?", start, end, duration)
            }
            Message::PromptBreakReasonOther => "Describe the break".to_string(),
            Message::BreakReasonOther => "Other...".to_string(),

            // === CHECKPOINT / STORAGE MESSAGES ===
            Message::CheckpointSaved(date) => format!("Workday {} saved", date),
            Message::CheckpointFailed(error) => format!("Failed to save the workday: {}", error),
            Message::LoadAllFailed(error) => format!("Failed to load stored workdays: {}", error),
            Message::LoadDayFailed(date, error) => format!("Failed to load workday {}: {}", date, error),
            Message::StoredDaySkipped(error) => format!("Skipping unreadable workday record: {}", error),
            Message::StoredBreakInvalid(date, error) => format!("Workday {} has an unreadable break: {}", date, error),

            // === DAY VIEW MESSAGES ===
            Message::DaysTitle(count) => format!("Stored workdays ({})", count),
            Message::DayTitle(date) => format!("Workday {}", date),
            Message::NoStoredDays => "No workdays recorded yet.".to_string(),
            Message::WorkdayNotFoundForDate(date) => format!("No workday record found for {}", date),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected YYYY-MM-DD or 'today'", value),

            // === WATCHER MESSAGES ===
            Message::WatcherStartingForeground => "Watching session events... Press Ctrl+C to exit.".to_string(),
            Message::WatcherReceivedSignal(name) => format!("Received {}", name),
            Message::WatcherCtrlCListenFailed(error) => format!("Failed to listen for Ctrl+C: {}", error),
            Message::WatcherSignalHandlingNotSupported => "Warning: Signal handling not supported on this platform".to_string(),
            Message::EventFeedClosed => "Session event feed closed".to_string(),
            Message::EventFeedFailed(error) => format!("Session event feed failed: {}", error),
            Message::InvalidSessionEvent(error) => format!("Ignoring session event: {}", error),
            Message::InboxClosed => "Event inbox closed".to_string(),
            Message::MonitorShuttingDown => "Shutting down tracker...".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleTracker => "Tracker settings".to_string(),
            Message::PromptLongBreakThreshold => "Ask for a reason after breaks longer than (minutes)".to_string(),
            Message::PromptTickInterval => "Tick interval (milliseconds)".to_string(),
            Message::PromptBreakReasons => "Break reasons offered in the prompt (comma separated)".to_string(),
            Message::PromptAutoStart => "Start tracking when the watcher starts?".to_string(),

            // === STATUS LABELS ===
            Message::StatusIdle => "Idle".to_string(),
            Message::StatusRunning => "Running".to_string(),
            Message::StatusOnBreak => "On break".to_string(),
            Message::StatusStopped => "Stopped".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All migrations completed successfully".to_string(),
            Message::DatabaseUpToDate => "Database is up to date".to_string(),
        };
        write!(f, "{}", s)
    }
}
