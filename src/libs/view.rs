use super::formatter::{format_duration, format_minutes};
use super::workday::WorkDay;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    /// Table of stored days, one row per day in the given order.
    pub fn days(days: &[WorkDay]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["DATE", "LOGIN", "START", "STOP", "ACTIVE", "BREAKS", "BREAK TIME"]);
        for day in days {
            table.add_row(row![
                day.date.format("%Y-%m-%d"),
                day.login_time.format("%H:%M"),
                day.start_time.format("%H:%M"),
                day.stop_time.map_or_else(|| "-".to_string(), |t| t.format("%H:%M").to_string()),
                format_minutes(day.active_minutes),
                day.breaks.len(),
                format_duration(&day.total_break_duration())
            ]);
        }
        table.printstd();

        Ok(())
    }

    /// Breaks of a single day followed by the day totals.
    pub fn breaks(day: &WorkDay) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "START", "END", "DURATION", "REASON"]);
        for (index, record) in day.breaks.iter().enumerate() {
            table.add_row(row![
                index + 1,
                record.start.format("%H:%M:%S"),
                record.end.map_or_else(|| "-".to_string(), |t| t.format("%H:%M:%S").to_string()),
                record.duration().map_or_else(|| "-".to_string(), |d| format_duration(&d)),
                record.reason.clone().unwrap_or_default()
            ]);
        }
        table.add_empty_row();
        table.add_row(row!["", "", "ACTIVE", format_minutes(day.active_minutes), ""]);
        table.add_row(row!["", "", "BREAKS", format_duration(&day.total_break_duration()), ""]);
        table.add_row(row!["", "", "ELAPSED", format_duration(&day.elapsed()), ""]);
        table.printstd();

        Ok(())
    }
}
