//! Backing store - one SQLite file holding named sheets
//!
//! Submodules:
//! - sheets: Sheet listing, full-sheet read and overwrite
//! - trophies: Trophy repository over the game sheets
//! - session_plan: The saved session plan
//! - checklist: Per-trophy checklist progress

mod checklist;
mod session_plan;
mod sheets;
mod trophies;

use rusqlite::{Connection, OpenFlags, Result};
use std::path::{Path, PathBuf};

use crate::error::TrackerError;

pub use checklist::{
    checklist_entries, checklist_progress, save_checklist_progress,
    save_checklist_progress_for_key,
};
pub use session_plan::{export_session_plan, load_session_plan, save_session_plan};
pub use sheets::{list_sheets, read_sheet, write_sheet};
pub use trophies::{import_sheet, load_trophies};

/// Location of the backing store. Connections are opened per operation; every
/// write replaces one sheet inside a single transaction.
#[derive(Debug, Clone)]
pub struct Workbook {
    path: PathBuf,
}

impl Workbook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Open for writing, creating the file and tables if needed
    pub fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        init_tables(&conn)?;
        Ok(conn)
    }

    /// Open an existing store. `None` when the file is not there yet.
    pub fn open_existing(&self) -> Result<Option<Connection>> {
        if !self.exists() {
            return Ok(None);
        }
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        init_tables(&conn)?;
        Ok(Some(conn))
    }

    /// Open an existing store, failing with `MissingStore` when there is none
    pub fn connect(&self) -> crate::error::Result<Connection> {
        self.open_existing()?
            .ok_or_else(|| TrackerError::MissingStore(self.path.clone()))
    }
}

fn init_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS sheets (
            name TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            columns TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // One JSON object per row, keyed by column name
    conn.execute(
        "CREATE TABLE IF NOT EXISTS sheet_rows (
            sheet TEXT NOT NULL,
            row_index INTEGER NOT NULL,
            data TEXT NOT NULL,
            PRIMARY KEY (sheet, row_index)
        )",
        [],
    )?;

    Ok(())
}
