//! Persisted summary of one tracked day.

use crate::libs::ledger::BreakRecord;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot of a tracking session, keyed by the calendar date it started on.
///
/// A `WorkDay` is built fresh at every checkpoint and never mutated after it
/// has been handed to a [`WorkDayStore`](crate::libs::storage::WorkDayStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkDay {
    pub date: NaiveDate,
    pub login_time: NaiveDateTime,
    pub start_time: NaiveDateTime,
    pub stop_time: Option<NaiveDateTime>,
    /// Active time excluding breaks and locked periods.
    pub active_minutes: f64,
    #[serde(default)]
    pub breaks: Vec<BreakRecord>,
}

#[derive(Debug, Error, PartialEq)]
pub enum WorkDayError {
    #[error("active minutes must not be negative, got {0}")]
    NegativeActiveMinutes(f64),
    #[error("stop time {stop} precedes start time {start}")]
    StopBeforeStart { start: NaiveDateTime, stop: NaiveDateTime },
    #[error("break #{index} ends at {end} before it starts at {start}")]
    BreakEndsBeforeStart {
        index: usize,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl WorkDay {
    /// Checks the invariants every stored day must satisfy.
    pub fn validate(&self) -> Result<(), WorkDayError> {
        if self.active_minutes < 0.0 {
            return Err(WorkDayError::NegativeActiveMinutes(self.active_minutes));
        }
        if let Some(stop) = self.stop_time {
            if stop < self.start_time {
                return Err(WorkDayError::StopBeforeStart {
                    start: self.start_time,
                    stop,
                });
            }
        }
        for (index, record) in self.breaks.iter().enumerate() {
            if let Some(end) = record.end {
                if end < record.start {
                    return Err(WorkDayError::BreakEndsBeforeStart {
                        index,
                        start: record.start,
                        end,
                    });
                }
            }
        }
        Ok(())
    }

    /// Sum of all finished breaks.
    pub fn total_break_duration(&self) -> Duration {
        self.breaks.iter().filter_map(BreakRecord::duration).fold(Duration::zero(), |acc, d| acc + d)
    }

    /// Wall time between start and stop; zero while the day has no stop time.
    pub fn elapsed(&self) -> Duration {
        self.stop_time.map_or_else(Duration::zero, |stop| (stop - self.start_time).max(Duration::zero()))
    }
}
