//! Foreground event loop for the watch command.
//!
//! The loop is the only consumer of the session inbox. It applies events
//! in arrival order and drives the periodic tick that accumulates active
//! time. A session-ending event, or an inbox with no producers left, ends
//! the session and the loop.

use crate::db::workdays::Workdays;
use crate::libs::clock::SystemClock;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::prompt::TerminalPrompt;
use crate::libs::session::{inbox, Inbox, NotificationHub, SessionEvent};
use crate::libs::tracker::Tracker;
use crate::{msg_debug, msg_info};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

/// Processes events and ticks until the session ends, then shuts the hub down.
pub async fn run(tracker: Tracker, mut inbox: Inbox, mut hub: NotificationHub, tick: Duration) {
    let tick = tick.max(Duration::from_millis(1));
    let mut interval = time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => tracker.tick(tick),
            event = inbox.recv() => match event {
                Some(SessionEvent::SessionEnding) => {
                    tracker.handle(SessionEvent::SessionEnding);
                    break;
                }
                Some(event) => {
                    tracker.handle(event);
                    msg_debug!(tracker.status_line());
                }
                None => {
                    msg_debug!(Message::InboxClosed);
                    tracker.handle(SessionEvent::SessionEnding);
                    break;
                }
            }
        }
    }

    msg_info!(Message::MonitorShuttingDown);
    hub.shutdown();
}

/// Runs the watcher in the foreground with signal handling and, optionally,
/// protocol lines read from stdin.
pub async fn run_with_signal_handling(config: &Config, feed_stdin: bool) -> Result<()> {
    let settings = config.tracker.clone().unwrap_or_default();

    let store = Arc::new(Workdays::new()?);
    let prompt = Arc::new(TerminalPrompt::new(settings.break_reasons.clone()).with_stdin_feed(feed_stdin));
    let tracker = Tracker::new(store, prompt, Arc::new(SystemClock), &settings);
    if settings.auto_start {
        tracker.start();
    }

    let (sender, inbox) = inbox();
    let mut hub = NotificationHub::new(sender);
    hub.subscribe_signals();
    if feed_stdin {
        hub.subscribe_stdin();
    }

    msg_info!(Message::WatcherStartingForeground);
    run(tracker, inbox, hub, Duration::from_millis(settings.tick_interval)).await;

    Ok(())
}
