//! Persistence gateway used by the tracker at checkpoints.

use crate::libs::workday::WorkDay;
use anyhow::Result;
use chrono::NaiveDate;

/// Durable storage of day summaries, one record per calendar date.
///
/// The SQLite implementation lives in [`crate::db::workdays::Workdays`].
pub trait WorkDayStore: Send + Sync {
    /// Inserts or replaces the record for `day.date` (last write wins).
    fn save(&self, day: &WorkDay) -> Result<()>;

    /// Returns the record for `date`, or `None` when nothing was stored for it.
    fn load(&self, date: NaiveDate) -> Result<Option<WorkDay>>;

    /// Returns every stored day, newest date first.
    ///
    /// A single unreadable record is skipped rather than failing the whole call.
    fn load_all(&self) -> Result<Vec<WorkDay>>;
}
