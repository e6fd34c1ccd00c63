#![allow(dead_code)]

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use timerec::libs::clock::ManualClock;
use timerec::libs::config::TrackerConfig;
use timerec::libs::prompt::{BreakPrompt, BreakPromptRequest, PromptCallback, PromptError, PromptOutcome};
use timerec::libs::storage::WorkDayStore;
use timerec::libs::tracker::Tracker;
use timerec::libs::workday::WorkDay;

pub fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap().and_hms_opt(hour, min, sec).unwrap()
}

/// Keeps saved days in memory, keyed by date.
#[derive(Default)]
pub struct MemoryStore {
    days: Mutex<BTreeMap<NaiveDate, WorkDay>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl WorkDayStore for MemoryStore {
    fn save(&self, day: &WorkDay) -> Result<()> {
        day.validate()?;
        self.days.lock().insert(day.date, day.clone());
        *self.saves.lock() += 1;
        Ok(())
    }

    fn load(&self, date: NaiveDate) -> Result<Option<WorkDay>> {
        Ok(self.days.lock().get(&date).cloned())
    }

    fn load_all(&self) -> Result<Vec<WorkDay>> {
        Ok(self.days.lock().values().rev().cloned().collect())
    }
}

/// A store whose every call fails.
pub struct FailingStore;

impl WorkDayStore for FailingStore {
    fn save(&self, _day: &WorkDay) -> Result<()> {
        Err(anyhow!("disk unavailable"))
    }

    fn load(&self, _date: NaiveDate) -> Result<Option<WorkDay>> {
        Err(anyhow!("disk unavailable"))
    }

    fn load_all(&self) -> Result<Vec<WorkDay>> {
        Err(anyhow!("disk unavailable"))
    }
}

/// Records every prompt and lets the test answer it later.
pub struct RecordingPrompt {
    available: bool,
    calls: Mutex<Vec<(BreakPromptRequest, Option<PromptCallback>)>>,
}

impl RecordingPrompt {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            available: true,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Arc::new(Self {
            available: false,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<BreakPromptRequest> {
        self.calls.lock().iter().map(|(request, _)| request.clone()).collect()
    }

    /// Answers the `index`-th prompt. Returns false if it was already answered.
    pub fn complete(&self, index: usize, outcome: PromptOutcome) -> bool {
        let callback = self.calls.lock().get_mut(index).and_then(|(_, callback)| callback.take());
        match callback {
            Some(callback) => {
                callback(outcome);
                true
            }
            None => false,
        }
    }
}

impl BreakPrompt for RecordingPrompt {
    fn prompt_break_reason(&self, request: BreakPromptRequest, on_done: PromptCallback) -> Result<(), PromptError> {
        if !self.available {
            return Err(PromptError::Unavailable("test prompt switched off".to_string()));
        }
        self.calls.lock().push((request, Some(on_done)));
        Ok(())
    }
}

pub fn tracker(store: Arc<dyn WorkDayStore>, prompt: Arc<dyn BreakPrompt>, clock: Arc<ManualClock>) -> Tracker {
    Tracker::new(store, prompt, clock, &TrackerConfig::default())
}
