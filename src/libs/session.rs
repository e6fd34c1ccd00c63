//! Session and power notifications, and the inbox that delivers them.
//!
//! Every notification source (signals, a piped event feed) posts
//! [`SessionEvent`]s into one [`Inbox`]. The daemon loop is the single
//! consumer and applies them to the tracker in arrival order.
//!
//! ## Line protocol
//!
//! Event feeds send one event per line, case-insensitively:
//!
//! ```text
//! lock | unlock | suspend | resume | logon | logoff | session-ending
//! break 12:00 12:45 Lunch
//! ```
//!
//! `sleep`/`wake`, `login`/`logout` and `shutdown` are accepted as aliases.
//! Blank lines and lines starting with `#` are ignored.

use crate::libs::messages::Message;
use crate::{msg_debug, msg_info, msg_warning};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;
use std::thread;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Logon,
    Logoff,
    Lock,
    Unlock,
    Suspend,
    Resume,
    SessionEnding,
    /// A finished break entered by hand.
    ManualBreak {
        start: NaiveDateTime,
        end: NaiveDateTime,
        kind: String,
    },
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Logon => write!(f, "logon"),
            SessionEvent::Logoff => write!(f, "logoff"),
            SessionEvent::Lock => write!(f, "lock"),
            SessionEvent::Unlock => write!(f, "unlock"),
            SessionEvent::Suspend => write!(f, "suspend"),
            SessionEvent::Resume => write!(f, "resume"),
            SessionEvent::SessionEnding => write!(f, "session-ending"),
            SessionEvent::ManualBreak { start, end, kind } => {
                write!(f, "break {} {} {}", start.format("%H:%M"), end.format("%H:%M"), kind)
            }
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionEventParseError {
    #[error("empty event line")]
    Empty,
    #[error("unknown session event '{0}'")]
    Unknown(String),
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("a break needs a start, an end and a kind: '{0}'")]
    IncompleteBreak(String),
    #[error("break ends at {end} before it starts at {start}")]
    EndBeforeStart { start: String, end: String },
}

impl SessionEvent {
    /// Parses one protocol line. Manual break times are placed on `date`.
    pub fn parse_line(line: &str, date: NaiveDate) -> Result<Self, SessionEventParseError> {
        let line = line.trim();
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Err(SessionEventParseError::Empty);
        };

        let event = match keyword.to_lowercase().as_str() {
            "logon" | "login" => SessionEvent::Logon,
            "logoff" | "logout" => SessionEvent::Logoff,
            "lock" => SessionEvent::Lock,
            "unlock" => SessionEvent::Unlock,
            "suspend" | "sleep" => SessionEvent::Suspend,
            "resume" | "wake" => SessionEvent::Resume,
            "session-ending" | "shutdown" => SessionEvent::SessionEnding,
            "break" => {
                let (Some(start), Some(end)) = (tokens.next(), tokens.next()) else {
                    return Err(SessionEventParseError::IncompleteBreak(line.to_string()));
                };
                let kind = tokens.collect::<Vec<_>>().join(" ");
                if kind.is_empty() {
                    return Err(SessionEventParseError::IncompleteBreak(line.to_string()));
                }
                let (start_time, end_time) = (parse_time(start)?, parse_time(end)?);
                if end_time < start_time {
                    return Err(SessionEventParseError::EndBeforeStart {
                        start: start.to_string(),
                        end: end.to_string(),
                    });
                }
                SessionEvent::ManualBreak {
                    start: date.and_time(start_time),
                    end: date.and_time(end_time),
                    kind,
                }
            }
            other => return Err(SessionEventParseError::Unknown(other.to_string())),
        };

        Ok(event)
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, SessionEventParseError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| SessionEventParseError::InvalidTime(value.to_string()))
}

impl FromStr for SessionEvent {
    type Err = SessionEventParseError;

    /// Manual breaks are placed on the current local date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s, Local::now().date_naive())
    }
}

/// Creates the inbox and its first sender.
pub fn inbox() -> (EventSender, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender(tx), Inbox(rx))
}

/// Producer side of the inbox. Cheap to clone, usable from any thread.
#[derive(Debug, Clone)]
pub struct EventSender(mpsc::UnboundedSender<SessionEvent>);

impl EventSender {
    /// Posts an event. Returns false once the inbox has been dropped.
    pub fn send(&self, event: SessionEvent) -> bool {
        self.0.send(event).is_ok()
    }
}

/// The single consumer of session events.
#[derive(Debug)]
pub struct Inbox(mpsc::UnboundedReceiver<SessionEvent>);

impl Inbox {
    /// Waits for the next event. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.0.recv().await
    }

    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.0.try_recv().ok()
    }
}

/// Owns the notification sources feeding an inbox.
///
/// Sources run until [`NotificationHub::shutdown`] is called; nothing is
/// unsubscribed implicitly.
pub struct NotificationHub {
    sender: EventSender,
    sources: Vec<JoinHandle<()>>,
}

impl NotificationHub {
    pub fn new(sender: EventSender) -> Self {
        Self { sender, sources: Vec::new() }
    }

    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Number of running async sources.
    pub fn source_count(&self) -> usize {
        self.sources.iter().filter(|source| !source.is_finished()).count()
    }

    /// Forwards protocol lines read from `reader` until it reaches EOF.
    pub fn subscribe_lines<R>(&mut self, reader: R)
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let sender = self.sender();
        self.sources.push(tokio::spawn(async move {
            let mut lines = reader.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if !forward_line(&sender, &line) {
                            break;
                        }
                    }
                    Ok(None) => {
                        msg_debug!(Message::EventFeedClosed);
                        break;
                    }
                    Err(e) => {
                        msg_warning!(Message::EventFeedFailed(e.to_string()));
                        break;
                    }
                }
            }
        }));
    }

    /// Forwards protocol lines piped on stdin.
    ///
    /// Meant for piped feeds. A terminal on stdin is shared with the break
    /// prompt, so `TerminalPrompt::with_stdin_feed` turns the prompt off in
    /// that case. Reading stdin blocks, so this source runs on a plain thread. It
    /// cannot be aborted; it stops at EOF or at the first line after the
    /// inbox is gone.
    pub fn subscribe_stdin(&mut self) {
        let sender = self.sender();
        let spawned = thread::Builder::new().name("event-feed".to_string()).spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if !forward_line(&sender, &line) {
                            return;
                        }
                    }
                    Err(e) => {
                        msg_warning!(Message::EventFeedFailed(e.to_string()));
                        return;
                    }
                }
            }
            msg_debug!(Message::EventFeedClosed);
        });
        if let Err(e) = spawned {
            msg_warning!(Message::EventFeedFailed(e.to_string()));
        }
    }

    /// Maps process signals to session events.
    ///
    /// On Unix: SIGTERM and SIGINT end the session, SIGHUP logs off,
    /// SIGUSR1 locks and SIGUSR2 unlocks. On Windows Ctrl+C ends the session.
    pub fn subscribe_signals(&mut self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let subscriptions = [
                (SignalKind::terminate(), "SIGTERM", SessionEvent::SessionEnding),
                (SignalKind::interrupt(), "SIGINT", SessionEvent::SessionEnding),
                (SignalKind::hangup(), "SIGHUP", SessionEvent::Logoff),
                (SignalKind::user_defined1(), "SIGUSR1", SessionEvent::Lock),
                (SignalKind::user_defined2(), "SIGUSR2", SessionEvent::Unlock),
            ];

            for (kind, name, event) in subscriptions {
                let mut stream = match signal(kind) {
                    Ok(stream) => stream,
                    Err(e) => {
                        msg_warning!(Message::EventFeedFailed(format!("{}: {}", name, e)));
                        continue;
                    }
                };
                let sender = self.sender();
                self.sources.push(tokio::spawn(async move {
                    while stream.recv().await.is_some() {
                        msg_info!(Message::WatcherReceivedSignal(name.to_string()));
                        if !sender.send(event.clone()) {
                            break;
                        }
                    }
                }));
            }
        }

        #[cfg(windows)]
        {
            let sender = self.sender();
            self.sources.push(tokio::spawn(async move {
                loop {
                    match tokio::signal::ctrl_c().await {
                        Ok(()) => {
                            msg_info!(Message::WatcherReceivedSignal("Ctrl+C".to_string()));
                            if !sender.send(SessionEvent::SessionEnding) {
                                break;
                            }
                        }
                        Err(e) => {
                            crate::msg_error!(Message::WatcherCtrlCListenFailed(e.to_string()));
                            break;
                        }
                    }
                }
            }));
        }

        #[cfg(not(any(unix, windows)))]
        {
            msg_warning!(Message::WatcherSignalHandlingNotSupported);
        }
    }

    /// Stops every async source. Call once when the consumer is done.
    pub fn shutdown(&mut self) {
        for source in self.sources.drain(..) {
            source.abort();
        }
    }
}

/// Parses and posts one line. Returns false when the inbox is gone.
fn forward_line(sender: &EventSender, line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return true;
    }
    match line.parse::<SessionEvent>() {
        Ok(event) => sender.send(event),
        Err(e) => {
            msg_warning!(Message::InvalidSessionEvent(e.to_string()));
            true
        }
    }
}
