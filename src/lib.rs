//! # timerec - work time recorder
//!
//! Records how long a user actively works during a day, telling active work
//! apart from breaks. Session and power notifications (lock, unlock,
//! suspend, resume, logon, logoff) open and close breaks automatically;
//! long breaks are classified by asking the user for a reason without
//! holding up tracking.
//!
//! ## Features
//!
//! - **Tracking**: Active time accumulation driven by a periodic tick
//! - **Breaks**: Automatic break detection from session events
//! - **Break reasons**: Short breaks labelled on the spot, long ones via a prompt
//! - **Storage**: One SQLite record per tracked day
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timerec::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
