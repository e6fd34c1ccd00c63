//! Work time tracking state machine.
//!
//! The tracker owns the session instants, the lock flag, the active time
//! accumulator and the break ledger. Everything lives behind one mutex,
//! shared by the periodic tick, the session event loop and the completion
//! of break reason prompts.
//!
//! ## States
//!
//! ```text
//!              start()                lock / suspend
//! NotStarted ─────────▶ Running ─────────────────────▶ OnBreak
//!                         ▲  │                            │
//!                         │  │ stop() / logoff            │ unlock / resume
//!                         │  ▼                            │
//!                         └─ Stopped ◀────────────────────┘ (resolver decides the reason)
//! ```
//!
//! Only `Running` accumulates active time. Beginning a break while one is
//! open and ending a break while none is open are no-ops, so duplicated or
//! reordered notifications never corrupt the ledger.
//!
//! ## Lock discipline
//!
//! The mutex is held for in-memory mutations only. Persistence and break
//! reason prompts run after it has been released; a prompt's answer takes
//! the lock again to amend the ledger entry it was issued for.

use crate::libs::clock::Clock;
use crate::libs::config::TrackerConfig;
use crate::libs::formatter::{format_duration, format_elapsed, format_minutes, format_time};
use crate::libs::ledger::{BreakId, BreakLedger, BreakRecord};
use crate::libs::messages::Message;
use crate::libs::prompt::{BreakPrompt, BreakPromptRequest};
use crate::libs::resolver::{BreakResolver, Disposition};
use crate::libs::session::SessionEvent;
use crate::libs::storage::WorkDayStore;
use crate::libs::workday::WorkDay;
use crate::{msg_debug, msg_info, msg_warning};
use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

pub const LOCK_LABEL: &str = "Lock";
pub const UNLOCK_LABEL: &str = "Unlock";
pub const SUSPEND_LABEL: &str = "Suspend";
pub const RESUME_LABEL: &str = "Resume";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    NotStarted,
    Running,
    OnBreak,
    Stopped,
}

impl TrackerStatus {
    pub fn label(self) -> Message {
        match self {
            TrackerStatus::NotStarted => Message::StatusIdle,
            TrackerStatus::Running => Message::StatusRunning,
            TrackerStatus::OnBreak => Message::StatusOnBreak,
            TrackerStatus::Stopped => Message::StatusStopped,
        }
    }
}

#[derive(Debug)]
struct TrackerState {
    start_time: Option<NaiveDateTime>,
    stop_time: Option<NaiveDateTime>,
    login_time: NaiveDateTime,
    active: std::time::Duration,
    is_locked: bool,
    /// Open break and the instant it began.
    current_break: Option<(BreakId, NaiveDateTime)>,
    ledger: BreakLedger,
}

impl TrackerState {
    fn new(login_time: NaiveDateTime) -> Self {
        Self {
            start_time: None,
            stop_time: None,
            login_time,
            active: std::time::Duration::ZERO,
            is_locked: false,
            current_break: None,
            ledger: BreakLedger::new(),
        }
    }

    fn active_minutes(&self) -> f64 {
        self.active.as_secs_f64() / 60.0
    }

    fn status(&self) -> TrackerStatus {
        if self.start_time.is_none() {
            TrackerStatus::NotStarted
        } else if self.current_break.is_some() {
            TrackerStatus::OnBreak
        } else if self.stop_time.is_some() {
            TrackerStatus::Stopped
        } else {
            TrackerStatus::Running
        }
    }

    fn elapsed(&self, now: NaiveDateTime) -> Duration {
        match self.start_time {
            Some(start) => (self.stop_time.unwrap_or(now) - start).max(Duration::zero()),
            None => Duration::zero(),
        }
    }

    fn snapshot(&self) -> Option<WorkDay> {
        let start = self.start_time?;
        Some(WorkDay {
            date: start.date(),
            login_time: self.login_time,
            start_time: start,
            stop_time: self.stop_time.map(|stop| stop.max(start)),
            active_minutes: self.active_minutes(),
            breaks: self.ledger.records(),
        })
    }

    fn begin_break(&mut self, now: NaiveDateTime, label: &str) {
        if self.current_break.is_some() {
            return;
        }
        match self.ledger.open(now, label) {
            Some(id) => {
                self.current_break = Some((id, now));
                msg_info!(Message::BreakStarted(label.to_string()));
            }
            // `current_break` and the ledger's open entry move together, so
            // this only runs if that pairing was broken. Adopt the orphan.
            None => {
                debug_assert!(false, "open break without a current_break pointer");
                self.current_break = self.ledger.open_entry().map(|(id, record)| (id, record.start));
            }
        }
    }
}

/// A long break waiting for its reason, carried out of the critical section.
struct PendingReason {
    id: BreakId,
    request: BreakPromptRequest,
    label: &'static str,
}

/// Shared handle to the tracking state. Clones drive the same session.
#[derive(Clone)]
pub struct Tracker {
    state: Arc<Mutex<TrackerState>>,
    store: Arc<dyn WorkDayStore>,
    resolver: Arc<BreakResolver>,
    clock: Arc<dyn Clock>,
}

impl Tracker {
    pub fn new(store: Arc<dyn WorkDayStore>, prompt: Arc<dyn BreakPrompt>, clock: Arc<dyn Clock>, config: &TrackerConfig) -> Self {
        let threshold = i64::try_from(config.long_break_threshold)
            .ok()
            .and_then(Duration::try_minutes)
            .unwrap_or(Duration::MAX);

        Self {
            state: Arc::new(Mutex::new(TrackerState::new(clock.now()))),
            store,
            resolver: Arc::new(BreakResolver::new(prompt, threshold)),
            clock,
        }
    }

    /// Begins a fresh session: new instants, zero active time, empty ledger.
    pub fn start(&self) {
        let now = self.clock.now();
        {
            let mut state = self.state.lock();
            state.start_time = Some(now);
            state.stop_time = None;
            state.login_time = now;
            state.active = std::time::Duration::ZERO;
            state.current_break = None;
            state.ledger.clear();
        }
        msg_info!(Message::TrackingStarted(format_time(&now)));
    }

    /// Marks the session stopped and saves the day.
    pub fn stop(&self) {
        let now = self.clock.now();
        self.state.lock().stop_time = Some(now);
        msg_info!(Message::TrackingStopped(format_time(&now)));
        self.checkpoint_or_log();
    }

    /// Adds `interval` to the active time while the session is running.
    pub fn tick(&self, interval: std::time::Duration) {
        let mut state = self.state.lock();
        if state.start_time.is_some() && state.stop_time.is_none() && !state.is_locked {
            state.active += interval;
        }
    }

    /// Time since start, up to the stop instant if there is one. Zero before start.
    pub fn elapsed(&self) -> Duration {
        let now = self.clock.now();
        self.state.lock().elapsed(now)
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.state.lock().start_time
    }

    pub fn stop_time(&self) -> Option<NaiveDateTime> {
        self.state.lock().stop_time
    }

    pub fn login_time(&self) -> NaiveDateTime {
        self.state.lock().login_time
    }

    pub fn active_minutes(&self) -> f64 {
        self.state.lock().active_minutes()
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().is_locked
    }

    pub fn status(&self) -> TrackerStatus {
        self.state.lock().status()
    }

    /// Copy of the ledger in chronological order.
    pub fn breaks(&self) -> Vec<BreakRecord> {
        self.state.lock().ledger.records()
    }

    pub fn current_break(&self) -> Option<BreakRecord> {
        let state = self.state.lock();
        state.ledger.open_entry().map(|(_, record)| record.clone())
    }

    /// Prompts issued for long breaks that have not been answered yet.
    pub fn pending_prompts(&self) -> usize {
        self.resolver.pending_prompts()
    }

    /// One-line status, e.g. `Running 01:02:03 (active 00:58)`.
    pub fn status_line(&self) -> String {
        let now = self.clock.now();
        let (status, elapsed, active) = {
            let state = self.state.lock();
            (state.status(), state.elapsed(now), state.active_minutes())
        };
        Message::TrackingStatus {
            status: status.label().to_string(),
            elapsed: format_elapsed(&elapsed),
            active: format_minutes(active),
        }
        .to_string()
    }

    /// The day as it would be saved now, or `None` before the first start.
    pub fn snapshot(&self) -> Option<WorkDay> {
        self.state.lock().snapshot()
    }

    /// Saves the current day. Returns the saved snapshot, or `None` when
    /// tracking has not started yet.
    pub fn checkpoint(&self) -> Result<Option<WorkDay>> {
        let Some(day) = self.snapshot() else {
            return Ok(None);
        };
        self.store.save(&day)?;
        msg_debug!(Message::CheckpointSaved(day.date.to_string()));
        Ok(Some(day))
    }

    fn checkpoint_or_log(&self) {
        if let Err(e) = self.checkpoint() {
            msg_warning!(Message::CheckpointFailed(format!("{:#}", e)));
        }
    }

    /// Every stored day, newest first. Storage failures yield an empty list.
    pub fn load_all(&self) -> Vec<WorkDay> {
        self.store.load_all().unwrap_or_else(|e| {
            msg_warning!(Message::LoadAllFailed(format!("{:#}", e)));
            Vec::new()
        })
    }

    pub fn load(&self, date: NaiveDate) -> Option<WorkDay> {
        self.store.load(date).unwrap_or_else(|e| {
            msg_warning!(Message::LoadDayFailed(date.to_string(), format!("{:#}", e)));
            None
        })
    }

    /// Records a finished break with a known label and saves the day.
    ///
    /// A break ending before it starts is rejected with a warning and
    /// `None` is returned.
    pub fn add_break_entry(&self, start: NaiveDateTime, end: NaiveDateTime, kind: &str) -> Option<BreakId> {
        if end < start {
            msg_warning!(Message::ManualBreakRejected {
                start: format_time(&start),
                end: format_time(&end),
                kind: kind.to_string(),
            });
            return None;
        }

        let id = self.state.lock().ledger.push_closed(start, end, Some(kind.to_string()));
        msg_info!(Message::ManualBreakAdded {
            start: format_time(&start),
            end: format_time(&end),
            kind: kind.to_string(),
        });
        self.checkpoint_or_log();
        Some(id)
    }

    /// Applies a session notification. Never fails: problems are logged.
    pub fn handle(&self, event: SessionEvent) {
        msg_debug!(Message::SessionEventReceived(event.to_string()));

        let now = self.clock.now();
        let pending = {
            let mut state = self.state.lock();
            match event {
                SessionEvent::Logon => {
                    if state.start_time.is_none() {
                        state.start_time = Some(now);
                    }
                    None
                }
                SessionEvent::Logoff => {
                    state.stop_time = Some(now);
                    None
                }
                SessionEvent::Lock => {
                    state.stop_time = Some(now);
                    state.is_locked = true;
                    state.begin_break(now, LOCK_LABEL);
                    None
                }
                SessionEvent::Unlock => {
                    if state.start_time.is_none() {
                        state.start_time = Some(now);
                    }
                    state.stop_time = None;
                    state.is_locked = false;
                    self.end_break(&mut state, now, UNLOCK_LABEL)
                }
                SessionEvent::Suspend => {
                    state.stop_time = Some(now);
                    state.begin_break(now, SUSPEND_LABEL);
                    None
                }
                SessionEvent::Resume => {
                    let pending = self.end_break(&mut state, now, RESUME_LABEL);
                    state.stop_time = None;
                    pending
                }
                SessionEvent::SessionEnding => {
                    drop(state);
                    self.end_session();
                    return;
                }
                SessionEvent::ManualBreak { start, end, kind } => {
                    drop(state);
                    self.add_break_entry(start, end, &kind);
                    return;
                }
            }
        };

        if let Some(pending) = pending {
            self.request_reason(pending);
        }
    }

    fn end_session(&self) {
        msg_info!(Message::SessionEnding);
        self.state.lock().stop_time = Some(self.clock.now());
        self.checkpoint_or_log();

        let pending = self.pending_prompts();
        if pending > 0 {
            msg_warning!(Message::BreakReasonsPending(pending));
        }
    }

    /// Closes the open break, classifying it right away when it was short.
    fn end_break(&self, state: &mut TrackerState, now: NaiveDateTime, label: &'static str) -> Option<PendingReason> {
        let (open_id, started) = state.current_break.take()?;

        let id = match state.ledger.close(open_id, now) {
            Some(_) => open_id,
            // Same pairing as in `begin_break`: keep the break rather than lose it.
            None => {
                debug_assert!(false, "current_break points at no open ledger entry");
                state.ledger.push_closed(started, now, None)
            }
        };
        let record = state.ledger.get(id)?.clone();
        let end = record.end.unwrap_or(now);
        let duration = end - record.start;

        match self.resolver.classify(duration) {
            Disposition::AutoClassified => {
                state.ledger.set_reason(id, label);
                msg_info!(Message::BreakEnded {
                    label: label.to_string(),
                    duration: format_elapsed(&duration),
                });
                None
            }
            Disposition::NeedsPrompt => Some(PendingReason {
                id,
                request: BreakPromptRequest {
                    start: record.start,
                    end,
                    duration,
                },
                label,
            }),
        }
    }

    fn request_reason(&self, pending: PendingReason) {
        msg_info!(Message::BreakReasonRequested(format_duration(&pending.request.duration)));

        let state = Arc::downgrade(&self.state);
        let id = pending.id;
        self.resolver
            .request(pending.request, pending.label, move |reason| apply_reason(&state, id, reason));
    }
}

fn apply_reason(state: &Weak<Mutex<TrackerState>>, id: BreakId, reason: String) {
    let applied = match state.upgrade() {
        Some(state) => state.lock().ledger.set_reason(id, reason.as_str()),
        None => false,
    };
    if applied {
        msg_info!(Message::BreakReasonApplied(reason));
    } else {
        msg_debug!(Message::BreakReasonDropped(id.value()));
    }
}
