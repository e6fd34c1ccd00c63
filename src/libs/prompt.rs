//! Asking the user why a long break happened.
//!
//! A prompt is fire-and-forget for the caller: `prompt_break_reason` returns
//! as soon as the question has been scheduled and the answer arrives later
//! through the completion callback, which is invoked exactly once.

use crate::libs::formatter::{format_elapsed, format_time};
use crate::libs::messages::Message;
use crate::msg_debug;
use chrono::{Duration, NaiveDateTime};
use dialoguer::{theme::ColorfulTheme, Input, Select};
use parking_lot::Mutex;
use std::io::IsTerminal;
use std::sync::Arc;
use std::thread;
use thiserror::Error;

/// Context shown to the user for a concluded break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakPromptRequest {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration: Duration,
}

/// What the user answered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptOutcome {
    pub confirmed: bool,
    pub reason: Option<String>,
}

impl PromptOutcome {
    pub fn confirmed(reason: impl Into<String>) -> Self {
        Self {
            confirmed: true,
            reason: Some(reason.into()),
        }
    }

    /// Cancelled, dismissed or failed.
    pub fn dismissed() -> Self {
        Self::default()
    }

    /// Final label for the break: the given reason when confirmed, otherwise `default`.
    pub fn resolve(&self, default: &str) -> String {
        match (self.confirmed, self.reason.as_deref().map(str::trim)) {
            (true, Some(reason)) if !reason.is_empty() => reason.to_string(),
            _ => default.to_string(),
        }
    }
}

pub type PromptCallback = Box<dyn FnOnce(PromptOutcome) + Send + 'static>;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("break prompt unavailable: {0}")]
    Unavailable(String),
}

pub trait BreakPrompt: Send + Sync {
    /// Schedules the question without blocking. On `Err` the callback is never called.
    fn prompt_break_reason(&self, request: BreakPromptRequest, on_done: PromptCallback) -> Result<(), PromptError>;
}

/// Prompt for hosts without any way to ask the user.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl BreakPrompt for NoPrompt {
    fn prompt_break_reason(&self, _request: BreakPromptRequest, _on_done: PromptCallback) -> Result<(), PromptError> {
        Err(PromptError::Unavailable("no interactive prompt configured".to_string()))
    }
}

/// Terminal prompt built on dialoguer.
///
/// Each question runs on its own thread; questions are shown one at a time
/// so two long breaks never fight over the terminal.
pub struct TerminalPrompt {
    reasons: Vec<String>,
    turn: Arc<Mutex<()>>,
    stdin_feed: bool,
}

impl TerminalPrompt {
    pub fn new(reasons: Vec<String>) -> Self {
        Self {
            reasons,
            turn: Arc::new(Mutex::new(())),
            stdin_feed: false,
        }
    }

    /// Marks stdin as the session event feed.
    pub fn with_stdin_feed(mut self, stdin_feed: bool) -> Self {
        self.stdin_feed = stdin_feed;
        self
    }
}

/// Whether a terminal prompt can be shown.
///
/// The prompt needs stderr on a terminal. When stdin carries the event feed
/// and is itself a terminal, keystrokes would be split between the feed and
/// the prompt, so the prompt is off.
pub fn terminal_availability(stdin_feed: bool, stdin_tty: bool, stderr_tty: bool) -> Result<(), PromptError> {
    if !stderr_tty {
        return Err(PromptError::Unavailable("stderr is not a terminal".to_string()));
    }
    if stdin_feed && stdin_tty {
        return Err(PromptError::Unavailable("the terminal is reading session events".to_string()));
    }
    Ok(())
}

impl BreakPrompt for TerminalPrompt {
    fn prompt_break_reason(&self, request: BreakPromptRequest, on_done: PromptCallback) -> Result<(), PromptError> {
        terminal_availability(self.stdin_feed, std::io::stdin().is_terminal(), std::io::stderr().is_terminal())?;

        let reasons = self.reasons.clone();
        let turn = Arc::clone(&self.turn);
        thread::Builder::new()
            .name("break-prompt".to_string())
            .spawn(move || {
                let _turn = turn.lock();
                let outcome = ask(&reasons, &request).unwrap_or_else(|e| {
                    msg_debug!(Message::BreakPromptFailed(e.to_string()));
                    PromptOutcome::dismissed()
                });
                on_done(outcome);
            })
            .map_err(|e| PromptError::Unavailable(e.to_string()))?;

        Ok(())
    }
}

fn ask(reasons: &[String], request: &BreakPromptRequest) -> dialoguer::Result<PromptOutcome> {
    let theme = ColorfulTheme::default();
    let mut items = reasons.to_vec();
    items.push(Message::BreakReasonOther.to_string());

    let question = Message::PromptBreakReason {
        start: format_time(&request.start),
        end: format_time(&request.end),
        duration: format_elapsed(&request.duration),
    };
    let selection = Select::with_theme(&theme).with_prompt(question.to_string()).items(&items).default(0).interact_opt()?;

    match selection {
        None => Ok(PromptOutcome::dismissed()),
        Some(index) if index < reasons.len() => Ok(PromptOutcome::confirmed(reasons[index].clone())),
        Some(_) => {
            let text: String = Input::with_theme(&theme)
                .with_prompt(Message::PromptBreakReasonOther.to_string())
                .allow_empty(true)
                .interact_text()?;
            if text.trim().is_empty() {
                Ok(PromptOutcome::dismissed())
            } else {
                Ok(PromptOutcome::confirmed(text.trim()))
            }
        }
    }
}
