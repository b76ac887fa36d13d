//! Trophy repository: every game sheet merged into one table

use trophytrack_core::constants::{is_reserved_sheet, CHECKLIST_PROGRESS};
use trophytrack_core::trophy::{find_by_key, find_by_name};
use trophytrack_core::Table;

use super::checklist::checklist_entries_from;
use super::sheets::{list_sheets, read_sheet, write_sheet};
use super::Workbook;
use crate::error::{Result, TrackerError};

/// Load all trophies and the names of the game sheets they came from.
///
/// A store that does not exist yet, or cannot be read, gives an empty table:
/// callers treat that as "no data yet".
pub fn load_trophies(workbook: &Workbook) -> (Table, Vec<String>) {
    match try_load_trophies(workbook) {
        Ok(Some(loaded)) => loaded,
        Ok(None) => {
            tracing::info!("No backing store at {} yet", workbook.path().display());
            (Table::default(), Vec::new())
        }
        Err(e) => {
            tracing::warn!("Failed to read trophies from {}: {}", workbook.path().display(), e);
            (Table::default(), Vec::new())
        }
    }
}

fn try_load_trophies(workbook: &Workbook) -> Result<Option<(Table, Vec<String>)>> {
    let Some(conn) = workbook.open_existing()? else {
        return Ok(None);
    };

    let game_sheets: Vec<String> = list_sheets(&conn)?
        .into_iter()
        .filter(|name| !is_reserved_sheet(name))
        .collect();

    let mut tables = Vec::with_capacity(game_sheets.len());
    for name in &game_sheets {
        if let Some(table) = read_sheet(&conn, name)? {
            tables.push(table);
        }
    }
    let mut trophies = Table::concat(tables);

    // Stored checklist progress overrides whatever the game sheet carries
    for (key, progress) in checklist_entries_from(&conn)? {
        let target = if key.game.is_empty() {
            find_by_name(&trophies, &key.trophy_name)
        } else {
            find_by_key(&trophies, &key)
        };
        match target {
            Some(index) => {
                trophies.set_cell(index, CHECKLIST_PROGRESS, progress);
            }
            None => tracing::debug!("Checklist progress for unknown trophy {}", key),
        }
    }

    tracing::debug!(games = game_sheets.len(), trophies = trophies.len(), "trophies loaded");
    Ok(Some((trophies, game_sheets)))
}

/// Replace (or add) one game sheet
pub fn import_sheet(workbook: &Workbook, name: &str, table: &Table) -> Result<()> {
    if is_reserved_sheet(name) {
        return Err(TrackerError::ReservedSheet(name.to_string()));
    }
    let mut conn = workbook.open()?;
    write_sheet(&mut conn, name, table)?;
    tracing::info!("Imported {} trophies into sheet '{}'", table.len(), name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trophytrack_core::constants as col;
    use trophytrack_core::Row;

    fn game(name: &str, trophies: &[&str]) -> Table {
        Table::from_rows(
            vec![col::GAME.into(), col::TROPHY_NAME.into()],
            trophies
                .iter()
                .map(|t| Row::new().with(col::GAME, name).with(col::TROPHY_NAME, *t))
                .collect(),
        )
    }

    #[test]
    fn test_missing_store_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = Workbook::new(dir.path().join("none.db"));
        let (table, games) = load_trophies(&workbook);
        assert!(table.is_empty());
        assert!(games.is_empty());
        assert!(!workbook.exists());
    }

    #[test]
    fn test_unreadable_store_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.db");
        std::fs::write(&path, b"definitely not sqlite, just some bytes to fill a page").unwrap();
        let (table, games) = load_trophies(&Workbook::new(path));
        assert!(table.is_empty());
        assert!(games.is_empty());
    }

    #[test]
    fn test_merges_game_sheets_and_skips_reserved() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = Workbook::new(dir.path().join("wb.db"));
        import_sheet(&workbook, "Hades", &game("Hades", &["Escape", "Father"])).unwrap();
        import_sheet(&workbook, "Celeste", &game("Celeste", &["Summit"])).unwrap();
        {
            let mut conn = workbook.open().unwrap();
            write_sheet(&mut conn, "Lookup", &game("Lookup", &["ignored"])).unwrap();
            write_sheet(&mut conn, "SessionPlan", &game("Hades", &["Escape"])).unwrap();
        }

        let (table, games) = load_trophies(&workbook);
        assert_eq!(games, vec!["Hades", "Celeste"]);
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.unique_values(col::TROPHY_NAME),
            vec!["Escape", "Father", "Summit"]
        );
    }

    #[test]
    fn test_import_rejects_reserved_names() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = Workbook::new(dir.path().join("wb.db"));
        let result = import_sheet(&workbook, "Dashboard", &game("X", &["Y"]));
        assert!(matches!(result, Err(TrackerError::ReservedSheet(_))));
    }
}
