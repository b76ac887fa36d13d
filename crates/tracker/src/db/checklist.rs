//! Checklist progress, kept in its own `Checklist` sheet keyed by game and trophy name

use rusqlite::Connection;
use trophytrack_core::constants::{CHECKLIST_PROGRESS, CHECKLIST_SHEET, GAME, TROPHY_NAME};
use trophytrack_core::trophy::{find_by_key, find_by_name};
use trophytrack_core::{ChecklistProgress, Row, Table, TrophyKey};

use super::sheets::{read_sheet, write_sheet};
use super::trophies::load_trophies;
use super::Workbook;
use crate::error::{Result, TrackerError};

/// Stored (key, serialized progress) pairs, in sheet order
pub(super) fn checklist_entries_from(conn: &Connection) -> Result<Vec<(TrophyKey, String)>> {
    let Some(sheet) = read_sheet(conn, CHECKLIST_SHEET)? else {
        return Ok(Vec::new());
    };
    Ok(sheet
        .rows()
        .iter()
        .filter_map(|row| {
            let progress = row.get(CHECKLIST_PROGRESS).as_text()?;
            Some((TrophyKey::of_row(row)?, progress))
        })
        .collect())
}

pub fn checklist_entries(workbook: &Workbook) -> Result<Vec<(TrophyKey, String)>> {
    match workbook.open_existing()? {
        Some(conn) => checklist_entries_from(&conn),
        None => Ok(Vec::new()),
    }
}

/// Save progress for the first trophy with this name.
///
/// Trophy names are not unique across games; when several match, the first in
/// table order is updated. Returns the key that was written.
pub fn save_checklist_progress(
    workbook: &Workbook,
    trophy_name: &str,
    progress: &ChecklistProgress,
) -> Result<TrophyKey> {
    let (trophies, _) = load_trophies(workbook);
    let key = find_by_name(&trophies, trophy_name)
        .and_then(|index| trophies.row(index))
        .and_then(TrophyKey::of_row)
        .ok_or_else(|| TrackerError::NotFound(trophy_name.to_string()))?;
    write_entry(workbook, &key, progress)?;
    Ok(key)
}

/// Save progress for exactly one (game, trophy name) pair
pub fn save_checklist_progress_for_key(
    workbook: &Workbook,
    key: &TrophyKey,
    progress: &ChecklistProgress,
) -> Result<()> {
    let (trophies, _) = load_trophies(workbook);
    if find_by_key(&trophies, key).is_none() {
        return Err(TrackerError::NotFound(key.to_string()));
    }
    write_entry(workbook, key, progress)
}

/// Progress of one trophy as the repository sees it. Malformed data reads as
/// no progress.
pub fn checklist_progress(workbook: &Workbook, key: &TrophyKey) -> ChecklistProgress {
    let (trophies, _) = load_trophies(workbook);
    let Some(row) = find_by_key(&trophies, key).and_then(|index| trophies.row(index)) else {
        return ChecklistProgress::default();
    };
    ChecklistProgress::from_cell(row.get(CHECKLIST_PROGRESS)).unwrap_or_else(|e| {
        tracing::warn!("Ignoring checklist progress of {}: {}", key, e);
        ChecklistProgress::default()
    })
}

fn write_entry(workbook: &Workbook, key: &TrophyKey, progress: &ChecklistProgress) -> Result<()> {
    let encoded = progress.to_json()?;
    let mut conn = workbook.open()?;
    let mut sheet = read_sheet(&conn, CHECKLIST_SHEET)?.unwrap_or_else(|| {
        Table::new(vec![GAME.into(), TROPHY_NAME.into(), CHECKLIST_PROGRESS.into()])
    });

    match find_by_key(&sheet, key) {
        Some(index) => {
            sheet.set_cell(index, CHECKLIST_PROGRESS, encoded);
        }
        None => sheet.push_row(
            Row::new()
                .with(GAME, key.game.as_str())
                .with(TROPHY_NAME, key.trophy_name.as_str())
                .with(CHECKLIST_PROGRESS, encoded),
        ),
    }

    write_sheet(&mut conn, CHECKLIST_SHEET, &sheet)?;
    tracing::info!("Checklist progress saved for {}", key);
    Ok(())
}
