//! Configuration management for timerec.
//!
//! Settings are kept in a pretty-printed `config.json` inside the platform
//! data directory. A missing file is not an error: every section is optional
//! and falls back to its defaults.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timerec::libs::config::Config;
//!
//! let config = Config::read()?;
//! let tracker = config.tracker.unwrap_or_default();
//! println!("long breaks start after {} minutes", tracker.long_break_threshold);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

/// Configuration file name inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Tracker behaviour settings.
///
/// ## Timing Configuration
///
/// - **Long breaks**: a concluded break longer than `long_break_threshold`
///   is not classified automatically; the user is asked for a reason.
/// - **Tick**: active time is accumulated in steps of `tick_interval`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Breaks up to this many minutes take the closing event's label
    /// (for example "Unlock"); longer ones trigger the reason prompt.
    pub long_break_threshold: u64,

    /// Tick interval in milliseconds used to accumulate active time.
    pub tick_interval: u64,

    /// Reasons offered by the break prompt, in display order. The prompt
    /// always adds a free-form entry after these.
    pub break_reasons: Vec<String>,

    /// Start tracking as soon as the watcher starts.
    pub auto_start: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            long_break_threshold: 15,
            tick_interval: 1000,
            break_reasons: vec!["Breakfast".to_string(), "Lunch".to_string(), "Meeting".to_string(), "Personal".to_string()],
            auto_start: true,
        }
    }
}

/// Root configuration container.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    /// Tracker settings; defaults apply when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,
}

impl Config {
    /// Reads the configuration file, returning defaults when it does not exist yet.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;

        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Runs the interactive setup wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let default = config.tracker.clone().unwrap_or_default();
        let theme = ColorfulTheme::default();

        msg_print!(Message::ConfigModuleTracker);

        let long_break_threshold = Input::with_theme(&theme)
            .with_prompt(Message::PromptLongBreakThreshold.to_string())
            .default(default.long_break_threshold)
            .interact_text()?;

        let tick_interval: u64 = Input::with_theme(&theme)
            .with_prompt(Message::PromptTickInterval.to_string())
            .default(default.tick_interval)
            .validate_with(|value: &u64| if *value > 0 { Ok(()) } else { Err("must be greater than zero") })
            .interact_text()?;

        let reasons: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptBreakReasons.to_string())
            .default(default.break_reasons.join(", "))
            .interact_text()?;

        let auto_start = Confirm::with_theme(&theme)
            .with_prompt(Message::PromptAutoStart.to_string())
            .default(default.auto_start)
            .interact()?;

        config.tracker = Some(TrackerConfig {
            long_break_threshold,
            tick_interval,
            break_reasons: parse_reasons(&reasons),
            auto_start,
        });

        Ok(config)
    }
}

/// Splits a comma separated reason list, dropping blanks and duplicates.
pub fn parse_reasons(input: &str) -> Vec<String> {
    let mut reasons: Vec<String> = Vec::new();
    for reason in input.split(',').map(str::trim).filter(|r| !r.is_empty()) {
        if !reasons.iter().any(|r| r.eq_ignore_ascii_case(reason)) {
            reasons.push(reason.to_string());
        }
    }
    reasons
}
