//! Ordered break records of the current tracking session.
//!
//! The ledger only grows or amends: entries are never removed one by one,
//! and the whole ledger is cleared when a new session starts. At most one
//! entry is open (no end yet) and, when present, it is always the last one.
//!
//! Entries are addressed by a [`BreakId`] rather than by position, so a
//! reason that arrives late (after other breaks were recorded) still lands
//! on the break it belongs to.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a ledger entry. Ids are never reused, not even across `clear()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BreakId(u64);

impl BreakId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BreakId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single break period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakRecord {
    /// When the break began.
    pub start: NaiveDateTime,
    /// When the break ended; `None` while it is still running.
    pub end: Option<NaiveDateTime>,
    /// Classification label, for example "Lock" or a reason given by the user.
    pub reason: Option<String>,
}

impl BreakRecord {
    pub fn open(start: NaiveDateTime, reason: impl Into<String>) -> Self {
        Self {
            start,
            end: None,
            reason: Some(reason.into()),
        }
    }

    /// A finished break. An `end` earlier than `start` is clamped to `start`;
    /// callers taking user input reject such intervals first.
    pub fn closed(start: NaiveDateTime, end: NaiveDateTime, reason: Option<String>) -> Self {
        Self {
            start,
            end: Some(end.max(start)),
            reason,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Length of the break, measured up to `now` while it is still open.
    pub fn duration_at(&self, now: NaiveDateTime) -> Duration {
        self.end.unwrap_or(now) - self.start
    }

    /// Length of a finished break.
    pub fn duration(&self) -> Option<Duration> {
        self.end.map(|end| end - self.start)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    id: BreakId,
    record: BreakRecord,
}

#[derive(Debug, Default)]
pub struct BreakLedger {
    entries: Vec<Entry>,
    last_id: u64,
}

impl BreakLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> BreakId {
        self.last_id += 1;
        BreakId(self.last_id)
    }

    /// Appends an open break. Returns `None` if another break is still open.
    pub fn open(&mut self, start: NaiveDateTime, reason: &str) -> Option<BreakId> {
        if self.open_entry().is_some() {
            return None;
        }
        let id = self.next_id();
        self.entries.push(Entry {
            id,
            record: BreakRecord::open(start, reason),
        });
        Some(id)
    }

    /// Closes the trailing open entry if it carries `id`, returning the closed record.
    pub fn close(&mut self, id: BreakId, end: NaiveDateTime) -> Option<BreakRecord> {
        let last = self.entries.last_mut()?;
        if last.id != id || !last.record.is_open() {
            return None;
        }
        last.record.end = Some(end.max(last.record.start));
        Some(last.record.clone())
    }

    /// Inserts an already finished break in start order among the finished
    /// ones, after any entry with the same start. An open entry stays last.
    pub fn push_closed(&mut self, start: NaiveDateTime, end: NaiveDateTime, reason: Option<String>) -> BreakId {
        let id = self.next_id();
        let entry = Entry {
            id,
            record: BreakRecord::closed(start, end, reason),
        };
        let closed = match self.entries.last() {
            Some(last) if last.record.is_open() => self.entries.len() - 1,
            _ => self.entries.len(),
        };
        let at = self.entries[..closed].partition_point(|entry| entry.record.start <= start);
        self.entries.insert(at, entry);
        id
    }

    /// Sets the reason of a finished break. Returns false for unknown ids and open breaks.
    pub fn set_reason(&mut self, id: BreakId, reason: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) if !entry.record.is_open() => {
                entry.record.reason = Some(reason.into());
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: BreakId) -> Option<&BreakRecord> {
        self.entries.iter().find(|entry| entry.id == id).map(|entry| &entry.record)
    }

    pub fn open_entry(&self) -> Option<(BreakId, &BreakRecord)> {
        self.entries.last().filter(|entry| entry.record.is_open()).map(|entry| (entry.id, &entry.record))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BreakId, &BreakRecord)> {
        self.entries.iter().map(|entry| (entry.id, &entry.record))
    }

    /// Deep copy of all records in chronological order.
    pub fn records(&self) -> Vec<BreakRecord> {
        self.entries.iter().map(|entry| entry.record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
