use crate::db::workdays::Workdays;
use crate::libs::messages::Message;
use crate::libs::storage::WorkDayStore;
use crate::libs::view::View;
use crate::{msg_info, msg_print, msg_warning};
use anyhow::Result;

/// Lists every stored workday, newest first.
pub fn cmd() -> Result<()> {
    let days = Workdays::new()?.load_all().unwrap_or_else(|e| {
        msg_warning!(Message::LoadAllFailed(format!("{:#}", e)));
        Vec::new()
    });

    if days.is_empty() {
        msg_info!(Message::NoStoredDays);
        return Ok(());
    }

    msg_print!(Message::DaysTitle(days.len()), true);
    View::days(&days)?;

    Ok(())
}
