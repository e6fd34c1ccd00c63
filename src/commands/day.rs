//! Show one stored workday with its breaks.

use crate::db::workdays::Workdays;
use crate::libs::messages::Message;
use crate::libs::storage::WorkDayStore;
use crate::libs::view::View;
use crate::{msg_error_anyhow, msg_info, msg_print};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

#[derive(Debug, Args)]
pub struct DayArgs {
    #[arg(long, short, default_value = "today", help = "Date to show (YYYY-MM-DD or 'today')")]
    date: String,
}

pub fn cmd(args: DayArgs) -> Result<()> {
    let date = parse_date(&args.date)?;

    let Some(day) = Workdays::new()?.load(date)? else {
        msg_info!(Message::WorkdayNotFoundForDate(date.to_string()));
        return Ok(());
    };

    msg_print!(Message::DayTitle(date.format("%B %-d, %Y").to_string()), true);
    View::breaks(&day)?;

    Ok(())
}

/// Accepts `today` (any case) or an ISO `YYYY-MM-DD` date.
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if date_str.trim().eq_ignore_ascii_case("today") {
        Ok(Local::now().date_naive())
    } else {
        NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| msg_error_anyhow!(Message::InvalidDate(date_str.to_string())))
    }
}
