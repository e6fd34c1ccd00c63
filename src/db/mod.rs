//! Database layer for timerec.
//!
//! SQLite persistence of tracked days, built on rusqlite. Opening a
//! database always brings its schema up to date through the migration
//! system first.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timerec::db::workdays::Workdays;
//! use timerec::libs::storage::WorkDayStore;
//!
//! let store = Workdays::new()?;
//! for day in store.load_all()? {
//!     println!("{} {:.1} min", day.date, day.active_minutes);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup.
pub mod db;

/// Versioned schema changes and their tracking table.
pub mod migrations;

/// The `WorkDayStore` implementation: days and their breaks.
pub mod workdays;
