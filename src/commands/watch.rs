//! Foreground work time tracking.
//!
//! Starts the tracker and applies session events until the session ends:
//! SIGTERM/SIGINT (Ctrl+C on Windows) end it, SIGHUP logs off, SIGUSR1 and
//! SIGUSR2 lock and unlock. With `--stdin`, protocol lines such as `lock`,
//! `resume` or `break 12:00 12:30 Lunch` are read from standard input, which
//! lets a desktop session hook pipe its notifications in. When stdin is a
//! terminal the break reason prompt is turned off and long breaks keep
//! their default label.

use crate::libs::config::Config;
use crate::libs::daemon;
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Read session events from standard input, one per line
    #[arg(long)]
    stdin: bool,
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    let config = Config::read()?;
    daemon::run_with_signal_handling(&config, args.stdin).await
}
