//! The saved session plan (`SessionPlan` sheet)

use trophytrack_core::constants::SESSION_PLAN_SHEET;
use trophytrack_core::Table;

use super::sheets::{read_sheet, write_sheet};
use super::Workbook;
use crate::error::{Result, TrackerError};
use crate::export::export_xlsx;

/// Persist the plan, replacing any previously saved plan
pub fn save_session_plan(workbook: &Workbook, plan: &Table) -> Result<()> {
    let mut conn = workbook.open()?;
    write_sheet(&mut conn, SESSION_PLAN_SHEET, plan)?;
    tracing::info!("Session plan saved ({} trophies)", plan.len());
    Ok(())
}

/// Last saved plan; empty when nothing was saved or the store is unreadable
pub fn load_session_plan(workbook: &Workbook) -> Table {
    let loaded = workbook
        .open_existing()
        .map_err(TrackerError::from)
        .and_then(|conn| match conn {
            Some(conn) => read_sheet(&conn, SESSION_PLAN_SHEET),
            None => Ok(None),
        });
    match loaded {
        Ok(plan) => plan.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Failed to read session plan: {}", e);
            Table::default()
        }
    }
}

/// Spreadsheet bytes of the plan, for download. Nothing is written to the store.
pub fn export_session_plan(plan: &Table) -> Result<Vec<u8>> {
    export_xlsx(plan, SESSION_PLAN_SHEET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trophytrack_core::Row;

    fn plan(names: &[&str]) -> Table {
        Table::from_rows(
            vec!["Game".into(), "Trophy Name".into(), "Estimated Time".into(), "Notes / Tips".into()],
            names
                .iter()
                .enumerate()
                .map(|(i, n)| {
                    Row::new()
                        .with("Game", "Astro Bot")
                        .with("Trophy Name", *n)
                        .with("Estimated Time", i as f64 + 0.5)
                })
                .collect(),
        )
    }

    #[test]
    fn test_round_trip_preserves_rows_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = Workbook::new(dir.path().join("wb.db"));
        let saved = plan(&["C", "A", "B"]);

        save_session_plan(&workbook, &saved).unwrap();
        assert_eq!(load_session_plan(&workbook), saved);
    }

    #[test]
    fn test_save_replaces_previous_plan() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = Workbook::new(dir.path().join("wb.db"));
        save_session_plan(&workbook, &plan(&["A", "B", "C"])).unwrap();
        save_session_plan(&workbook, &plan(&["D"])).unwrap();
        assert_eq!(load_session_plan(&workbook), plan(&["D"]));
    }

    #[test]
    fn test_load_without_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = Workbook::new(dir.path().join("wb.db"));
        assert!(load_session_plan(&workbook).is_empty());
        assert!(!workbook.exists());
    }

    #[test]
    fn test_export_has_no_side_effect() {
        let dir = tempfile::tempdir().unwrap();
        let workbook = Workbook::new(dir.path().join("wb.db"));
        let bytes = export_session_plan(&plan(&["A"])).unwrap();
        assert!(bytes.starts_with(b"PK"));
        assert!(!workbook.exists());
    }
}
