//! Named sheets: listing, reading and full overwrite

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use trophytrack_core::{Row, Table};

use crate::error::Result;

/// Sheet names in workbook order
pub fn list_sheets(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM sheets ORDER BY position, name")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

/// Read a whole sheet. `None` if there is no sheet by that name.
pub fn read_sheet(conn: &Connection, name: &str) -> Result<Option<Table>> {
    let columns: Option<String> = conn
        .query_row("SELECT columns FROM sheets WHERE name = ?1", [name], |row| row.get(0))
        .optional()?;
    let Some(columns) = columns else {
        return Ok(None);
    };
    let columns: Vec<String> = serde_json::from_str(&columns)?;

    let mut stmt = conn.prepare("SELECT data FROM sheet_rows WHERE sheet = ?1 ORDER BY row_index")?;
    let raw = stmt
        .query_map([name], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let rows = raw
        .iter()
        .map(|data| serde_json::from_str::<Row>(data))
        .collect::<serde_json::Result<Vec<_>>>()?;

    Ok(Some(Table::from_rows(columns, rows)))
}

/// Replace the sheet's content entirely. A new sheet is appended after the
/// existing ones; an existing sheet keeps its position.
pub fn write_sheet(conn: &mut Connection, name: &str, table: &Table) -> Result<()> {
    let columns = serde_json::to_string(table.columns())?;
    let encoded = table
        .rows()
        .iter()
        .map(serde_json::to_string)
        .collect::<serde_json::Result<Vec<_>>>()?;
    let now = Utc::now().to_rfc3339();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO sheets (name, position, columns, updated_at)
         VALUES (?1, (SELECT COALESCE(MAX(position), -1) + 1 FROM sheets), ?2, ?3)
         ON CONFLICT(name) DO UPDATE SET
         columns = excluded.columns,
         updated_at = excluded.updated_at",
        (name, &columns, &now),
    )?;
    tx.execute("DELETE FROM sheet_rows WHERE sheet = ?1", [name])?;
    {
        let mut insert =
            tx.prepare("INSERT INTO sheet_rows (sheet, row_index, data) VALUES (?1, ?2, ?3)")?;
        for (index, data) in encoded.iter().enumerate() {
            insert.execute((name, index as i64, data))?;
        }
    }
    tx.commit()?;

    tracing::debug!(sheet = name, rows = table.len(), "sheet written");
    Ok(())
}
