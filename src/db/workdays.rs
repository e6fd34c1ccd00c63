//! SQLite storage of tracked days.
//!
//! A day is one `workdays` row keyed by its date plus its breaks in the
//! `breaks` table, ordered by their position in the ledger. Saving replaces
//! the whole day atomically.

use crate::db::db::Db;
use crate::libs::ledger::BreakRecord;
use crate::libs::messages::Message;
use crate::libs::storage::WorkDayStore;
use crate::libs::workday::WorkDay;
use crate::msg_warning;
use anyhow::Result;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const UPSERT_WORKDAY: &str = "INSERT INTO workdays (date, login_time, start_time, stop_time, active_minutes)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(date) DO UPDATE SET
        login_time = excluded.login_time,
        start_time = excluded.start_time,
        stop_time = excluded.stop_time,
        active_minutes = excluded.active_minutes";
const DELETE_BREAKS: &str = "DELETE FROM breaks WHERE workday_date = ?1";
const INSERT_BREAK: &str = "INSERT INTO breaks (workday_date, position, start, end, reason) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_BY_DATE: &str = "SELECT date, login_time, start_time, stop_time, active_minutes FROM workdays WHERE date = ?1";
const SELECT_ALL: &str = "SELECT date, login_time, start_time, stop_time, active_minutes FROM workdays ORDER BY date DESC";
const SELECT_BREAKS: &str = "SELECT start, end, reason FROM breaks WHERE workday_date = ?1 ORDER BY position";

pub struct Workdays {
    conn: Mutex<Connection>,
}

impl Workdays {
    pub fn new() -> Result<Self> {
        let db = Db::new()?;
        Ok(Workdays { conn: Mutex::new(db.conn) })
    }

    /// Opens the store backed by the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Db::open(path)?;
        Ok(Workdays { conn: Mutex::new(db.conn) })
    }
}

fn workday_from_row(row: &Row) -> rusqlite::Result<WorkDay> {
    Ok(WorkDay {
        date: row.get(0)?,
        login_time: row.get(1)?,
        start_time: row.get(2)?,
        stop_time: row.get(3)?,
        active_minutes: row.get(4)?,
        breaks: Vec::new(),
    })
}

fn fetch_breaks(conn: &Connection, date: NaiveDate) -> rusqlite::Result<Vec<BreakRecord>> {
    let mut stmt = conn.prepare(SELECT_BREAKS)?;
    let breaks = stmt
        .query_map(params![date], |row| {
            Ok(BreakRecord {
                start: row.get(0)?,
                end: row.get(1)?,
                reason: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(breaks)
}

impl WorkDayStore for Workdays {
    fn save(&self, day: &WorkDay) -> Result<()> {
        day.validate()?;

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            UPSERT_WORKDAY,
            params![day.date, day.login_time, day.start_time, day.stop_time, day.active_minutes],
        )?;
        tx.execute(DELETE_BREAKS, params![day.date])?;
        {
            let mut stmt = tx.prepare(INSERT_BREAK)?;
            for (position, record) in day.breaks.iter().enumerate() {
                stmt.execute(params![day.date, position as i64, record.start, record.end, record.reason])?;
            }
        }
        tx.commit()?;

        Ok(())
    }

    fn load(&self, date: NaiveDate) -> Result<Option<WorkDay>> {
        let conn = self.conn.lock();
        let Some(mut day) = conn.query_row(SELECT_BY_DATE, params![date], workday_from_row).optional()? else {
            return Ok(None);
        };
        day.breaks = fetch_breaks(&conn, date)?;
        Ok(Some(day))
    }

    fn load_all(&self) -> Result<Vec<WorkDay>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], workday_from_row)?;

        let mut workdays = Vec::new();
        for row in rows {
            let mut day = match row {
                Ok(day) => day,
                Err(e) => {
                    msg_warning!(Message::StoredDaySkipped(e.to_string()));
                    continue;
                }
            };
            match fetch_breaks(&conn, day.date) {
                Ok(breaks) => day.breaks = breaks,
                Err(e) => {
                    msg_warning!(Message::StoredBreakInvalid(day.date.to_string(), e.to_string()));
                    continue;
                }
            }
            if let Err(e) = day.validate() {
                msg_warning!(Message::StoredDaySkipped(e.to_string()));
                continue;
            }
            workdays.push(day);
        }

        Ok(workdays)
    }
}
