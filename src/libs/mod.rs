//! Core library modules for timerec.
//!
//! ## Features
//!
//! - **Tracking core**: Break ledger, tracking state machine, break reason resolver
//! - **Collaborators**: Clock, prompt service, persistence gateway, session events
//! - **Infrastructure**: Configuration, data storage, messaging, formatting
//! - **User Interface**: Console tables, the foreground watcher loop
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use timerec::db::workdays::Workdays;
//! use timerec::libs::clock::SystemClock;
//! use timerec::libs::config::TrackerConfig;
//! use timerec::libs::prompt::NoPrompt;
//! use timerec::libs::session::SessionEvent;
//! use timerec::libs::tracker::Tracker;
//!
//! let store = Arc::new(Workdays::new()?);
//! let tracker = Tracker::new(store, Arc::new(NoPrompt), Arc::new(SystemClock), &TrackerConfig::default());
//! tracker.start();
//! tracker.handle(SessionEvent::Lock);
//! tracker.handle(SessionEvent::Unlock);
//! tracker.stop();
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod clock;
pub mod config;
pub mod daemon;
pub mod data_storage;
pub mod formatter;
pub mod ledger;
pub mod messages;
pub mod prompt;
pub mod resolver;
pub mod session;
pub mod storage;
pub mod tracker;
pub mod view;
pub mod workday;
