//! Duration formatting for the status line, tables and prompts.
//!
//! ## Format Specifications
//!
//! - `format_duration`: `HH:MM`, used for day totals and break lengths
//! - `format_elapsed`: `HH:MM:SS`, used for the running status line
//! - `format_minutes`: `HH:MM` from a floating-point minute count
//!
//! Negative durations are treated as zero. Hours are not wrapped at 24.
//!
//! ## Examples
//!
//! ```rust
//! use timerec::libs::formatter::{format_duration, format_elapsed};
//! use chrono::Duration;
//!
//! assert_eq!(format_duration(&(Duration::hours(2) + Duration::minutes(30))), "02:30");
//! assert_eq!(format_elapsed(&Duration::seconds(3725)), "01:02:05");
//! ```

use chrono::{Duration, NaiveDateTime};

pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

pub fn format_elapsed(duration: &Duration) -> String {
    let total = duration.num_seconds().max(0);

    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Formats a minute count such as `WorkDay::active_minutes`, truncating partial minutes.
pub fn format_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return "00:00".to_string();
    }
    format_duration(&Duration::minutes(minutes.floor() as i64))
}

pub fn format_time(time: &NaiveDateTime) -> String {
    time.format("%H:%M:%S").to_string()
}
