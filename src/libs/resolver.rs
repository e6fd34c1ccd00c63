//! Deciding the final reason of a concluded break.
//!
//! Short breaks are classified on the spot with the label of the event that
//! ended them. Long breaks are handed to a [`BreakPrompt`]; the answer is
//! applied whenever it arrives, without blocking the tracker in between.
//!
//! ```text
//! break ends ──▶ classify(duration)
//!                  ├─ <= threshold ──▶ reason = closing label (under the tracker lock)
//!                  └─ >  threshold ──▶ request(): prompt issued after the lock is released
//!                                          ├─ answered  ──▶ apply(reason)
//!                                          ├─ dismissed ──▶ apply(closing label)
//!                                          └─ unavailable ▶ apply(closing label), synchronously
//! ```

use crate::libs::messages::Message;
use crate::libs::prompt::{BreakPrompt, BreakPromptRequest, PromptCallback, PromptOutcome};
use crate::msg_warning;
use chrono::Duration;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Breaks up to this many minutes are classified without asking.
pub const DEFAULT_LONG_BREAK_THRESHOLD_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The closing event's label becomes the reason immediately.
    AutoClassified,
    /// The user is asked for a reason.
    NeedsPrompt,
}

pub struct BreakResolver {
    prompt: Arc<dyn BreakPrompt>,
    threshold: Duration,
    pending: Arc<AtomicUsize>,
}

impl BreakResolver {
    pub fn new(prompt: Arc<dyn BreakPrompt>, threshold: Duration) -> Self {
        Self {
            prompt,
            threshold,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn classify(&self, duration: Duration) -> Disposition {
        if duration <= self.threshold {
            Disposition::AutoClassified
        } else {
            Disposition::NeedsPrompt
        }
    }

    /// Number of prompts issued whose answer has not been applied yet.
    pub fn pending_prompts(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Asks for the reason of a long break and hands the final label to `apply`.
    ///
    /// `apply` runs exactly once: on the prompt's completion thread when the
    /// user answers or dismisses, or before this call returns when the prompt
    /// service is unavailable. Must not be called while holding the tracker lock.
    pub fn request<F>(&self, request: BreakPromptRequest, default_label: &str, apply: F)
    where
        F: FnOnce(String) + Send + 'static,
    {
        let slot = Arc::new(Mutex::new(Some(apply)));
        self.pending.fetch_add(1, Ordering::SeqCst);

        let on_done: PromptCallback = {
            let slot = Arc::clone(&slot);
            let pending = Arc::clone(&self.pending);
            let default_label = default_label.to_string();
            Box::new(move |outcome: PromptOutcome| {
                let apply = slot.lock().take();
                if let Some(apply) = apply {
                    pending.fetch_sub(1, Ordering::SeqCst);
                    apply(outcome.resolve(&default_label));
                }
            })
        };

        if let Err(e) = self.prompt.prompt_break_reason(request, on_done) {
            msg_warning!(Message::BreakPromptUnavailable(e.to_string()));
            let apply = slot.lock().take();
            if let Some(apply) = apply {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                apply(default_label.to_string());
            }
        }
    }
}
