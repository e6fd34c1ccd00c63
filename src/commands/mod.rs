//! Command-line interface of timerec.
//!
//! ## Available Commands
//!
//! - **`init`**: Interactive configuration wizard
//! - **`watch`**: Track work time in the foreground, reacting to session events
//! - **`days`**: Table of every stored workday, newest first
//! - **`day`**: One workday with its breaks

pub mod day;
pub mod days;
pub mod init;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Track work time and breaks from session events")]
    Watch(watch::WatchArgs),
    #[command(about = "List stored workdays")]
    Days,
    #[command(about = "Show a workday with its breaks")]
    Day(day::DayArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Watch(args) => watch::cmd(args).await,
            Commands::Days => days::cmd(),
            Commands::Day(args) => day::cmd(args),
        }
    }
}
